//! PostgreSQL record store backed by a sqlx connection pool.
//!
//! Each trait method is one SQL statement. There are no multi-statement
//! transactions and no foreign keys between the three tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CollectionCounts, RecordStore, StoreError};
use crate::{
    db::DbPool,
    models::{
        account::{Account, AccountPatch},
        bank_link::{BankLink, BankLinkPatch},
        transfer::{Transfer, TransferKind, TransferPatch, TransferView},
    },
};

const ACCOUNT_COLUMNS: &str = "id, identity, full_name, email, profile_picture, balance_cents, \
     mpin, linked_banks, is_profile_complete, created_at, updated_at";

const TRANSFER_COLUMNS: &str = "id, sender_id, receiver_id, amount_cents, status, kind, timestamp";

const BANK_LINK_COLUMNS: &str =
    "id, user_id, user_name, bank_name, account_number, is_verified, created_at";

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Turn a unique-key violation into `StoreError::Duplicate`.
fn insert_error(err: sqlx::Error, what: String) -> StoreError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate(what),
        other => StoreError::Database(other),
    }
}

/// Build an ILIKE pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl RecordStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn counts(&self) -> Result<CollectionCounts, StoreError> {
        let (users, transactions, bank_links): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM accounts),
                (SELECT COUNT(*) FROM transfers),
                (SELECT COUNT(*) FROM bank_links)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CollectionCounts {
            users,
            transactions,
            bank_links,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn find_account_by_identity(
        &self,
        identity: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE identity = $1"
        ))
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn list_accounts(&self, search: Option<&str>) -> Result<Vec<Account>, StoreError> {
        let accounts = match search {
            Some(needle) => {
                sqlx::query_as::<_, Account>(&format!(
                    r#"
                    SELECT {ACCOUNT_COLUMNS} FROM accounts
                    WHERE full_name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'
                    ORDER BY created_at, id
                    "#
                ))
                .bind(contains_pattern(needle))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Account>(&format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at, id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(accounts)
    }

    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let what = format!("account with identity {}", account.identity);
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (
                id, identity, full_name, email, profile_picture, balance_cents,
                mpin, linked_banks, is_profile_complete, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id)
        .bind(account.identity)
        .bind(account.full_name)
        .bind(account.email)
        .bind(account.profile_picture)
        .bind(account.balance_cents)
        .bind(account.mpin)
        .bind(account.linked_banks)
        .bind(account.is_profile_complete)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, what))
    }

    async fn patch_account(
        &self,
        id: &str,
        patch: &AccountPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                profile_picture = COALESCE($4, profile_picture),
                balance_cents = COALESCE($5, balance_cents),
                linked_banks = COALESCE($6, linked_banks),
                is_profile_complete = COALESCE($7, is_profile_complete),
                updated_at = $8
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.full_name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.profile_picture.as_deref())
        .bind(patch.balance_cents)
        .bind(patch.linked_banks.clone())
        .bind(patch.is_profile_complete)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn set_account_mpin(
        &self,
        identity: &str,
        sealed: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET mpin = $2, updated_at = $3
            WHERE identity = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(identity)
        .bind(sealed)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn delete_account(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_transfer(&self, transfer: Transfer) -> Result<Transfer, StoreError> {
        let what = format!("transfer {}", transfer.id);
        sqlx::query_as::<_, Transfer>(&format!(
            r#"
            INSERT INTO transfers (id, sender_id, receiver_id, amount_cents, status, kind, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TRANSFER_COLUMNS}
            "#
        ))
        .bind(transfer.id)
        .bind(transfer.sender_id)
        .bind(transfer.receiver_id)
        .bind(transfer.amount_cents)
        .bind(transfer.status)
        .bind(transfer.kind)
        .bind(transfer.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, what))
    }

    async fn list_transfers(
        &self,
        kind: Option<TransferKind>,
    ) -> Result<Vec<TransferView>, StoreError> {
        // Left joins: a party that no longer resolves yields a NULL name.
        let views = sqlx::query_as::<_, TransferView>(
            r#"
            SELECT t.id, t.sender_id, t.receiver_id, t.amount_cents, t.status, t.kind, t.timestamp,
                   s.full_name AS sender_name,
                   r.full_name AS receiver_name
            FROM transfers t
            LEFT JOIN accounts s ON s.identity = t.sender_id
            LEFT JOIN accounts r ON r.identity = t.receiver_id
            WHERE $1::transfer_kind IS NULL OR t.kind = $1
            ORDER BY t.timestamp DESC, t.id ASC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    async fn patch_transfer(
        &self,
        id: &str,
        patch: &TransferPatch,
    ) -> Result<Option<Transfer>, StoreError> {
        let transfer = sqlx::query_as::<_, Transfer>(&format!(
            r#"
            UPDATE transfers
            SET sender_id = COALESCE($2, sender_id),
                receiver_id = COALESCE($3, receiver_id),
                amount_cents = COALESCE($4, amount_cents),
                status = COALESCE($5, status),
                kind = COALESCE($6, kind)
            WHERE id = $1
            RETURNING {TRANSFER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.sender_id.as_deref())
        .bind(patch.receiver_id.as_deref())
        .bind(patch.amount_cents)
        .bind(patch.status)
        .bind(patch.kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transfer)
    }

    async fn insert_bank_link(&self, link: BankLink) -> Result<BankLink, StoreError> {
        let what = format!("bank link {}", link.id);
        sqlx::query_as::<_, BankLink>(&format!(
            r#"
            INSERT INTO bank_links (id, user_id, user_name, bank_name, account_number, is_verified, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BANK_LINK_COLUMNS}
            "#
        ))
        .bind(link.id)
        .bind(link.user_id)
        .bind(link.user_name)
        .bind(link.bank_name)
        .bind(link.account_number)
        .bind(link.is_verified)
        .bind(link.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, what))
    }

    async fn list_bank_links(&self) -> Result<Vec<BankLink>, StoreError> {
        let links = sqlx::query_as::<_, BankLink>(&format!(
            "SELECT {BANK_LINK_COLUMNS} FROM bank_links ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn patch_bank_link(
        &self,
        id: &str,
        patch: &BankLinkPatch,
    ) -> Result<Option<BankLink>, StoreError> {
        let link = sqlx::query_as::<_, BankLink>(&format!(
            r#"
            UPDATE bank_links
            SET user_id = COALESCE($2, user_id),
                user_name = COALESCE($3, user_name),
                bank_name = COALESCE($4, bank_name),
                account_number = COALESCE($5, account_number),
                is_verified = COALESCE($6, is_verified)
            WHERE id = $1
            RETURNING {BANK_LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.user_id.as_deref())
        .bind(patch.user_name.as_deref())
        .bind(patch.bank_name.as_deref())
        .bind(patch.account_number.as_deref())
        .bind(patch.is_verified)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn delete_bank_link(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bank_links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::transfer::TransferStatus;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(contains_pattern("alice"), "%alice%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    // The tests below need a live server: DATABASE_URL=... cargo test -- --ignored

    fn account(identity: &str, name: &str, email: &str) -> Account {
        Account::new(
            format!("id-{identity}"),
            identity.to_string(),
            name.to_string(),
            email.to_string(),
            String::new(),
            Utc::now(),
        )
    }

    fn transfer(id: &str, from: &str, to: &str, kind: TransferKind, hour: u32) -> Transfer {
        Transfer {
            id: id.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            amount_cents: 100,
            status: TransferStatus::Success,
            kind: Some(kind),
            timestamp: Utc
                .with_ymd_and_hms(2024, 7, 29, hour, 0, 0)
                .single()
                .unwrap(),
        }
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn search_is_literal_and_case_insensitive(pool: DbPool) {
        let store = PgStore::new(pool);
        for (uid, name, email) in [
            ("u1", "Alice Johnson", "alice@Example.com"),
            ("u2", "Bob", "bob@example.com"),
            ("u3", "Sale 50%", "deals@other.org"),
        ] {
            store.insert_account(account(uid, name, email)).await.unwrap();
        }

        let found = store.list_accounts(Some("EXAMPLE")).await.unwrap();
        assert_eq!(found.len(), 2);

        let found = store.list_accounts(Some(" ")).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|a| a.identity.as_str()).collect();
        assert_eq!(ids, ["u1", "u3"]);

        let found = store.list_accounts(Some("50%")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.list_accounts(Some("5_%")).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn duplicate_identity_is_reported(pool: DbPool) {
        let store = PgStore::new(pool);
        store.insert_account(account("u1", "A", "a@x.io")).await.unwrap();

        let mut again = account("u1", "B", "b@x.io");
        again.id = "other".to_string();
        let err = store.insert_account(again).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn transfers_join_names_order_and_filter(pool: DbPool) {
        let store = PgStore::new(pool);
        store
            .insert_account(account("user1", "Alice", "a@x.io"))
            .await
            .unwrap();
        store.insert_account(account("user2", "Bob", "b@x.io")).await.unwrap();

        for t in [
            transfer("tx-b", "user1", "user2", TransferKind::Sent, 10),
            transfer("tx-a", "user2", "user1", TransferKind::Received, 10),
            transfer("tx-c", "user1", "ghost", TransferKind::Sent, 12),
        ] {
            store.insert_transfer(t).await.unwrap();
        }

        let all = store.list_transfers(None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|v| v.transfer.id.as_str()).collect();
        assert_eq!(ids, ["tx-c", "tx-a", "tx-b"]);
        assert_eq!(all[0].sender_name.as_deref(), Some("Alice"));
        assert_eq!(all[0].receiver_name, None);
        assert_eq!(all[1].sender_name.as_deref(), Some("Bob"));

        let sent = store.list_transfers(Some(TransferKind::Sent)).await.unwrap();
        let ids: Vec<&str> = sent.iter().map(|v| v.transfer.id.as_str()).collect();
        assert_eq!(ids, ["tx-c", "tx-b"]);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn mpin_status_column_follows_value(pool: DbPool) {
        let store = PgStore::new(pool.clone());
        store.insert_account(account("u1", "A", "a@x.io")).await.unwrap();
        store.set_account_mpin("u1", "1234", Utc::now()).await.unwrap();

        let status: String =
            sqlx::query_scalar("SELECT mpin_status FROM accounts WHERE identity = 'u1'")
                .fetch_one(&pool)
                .await
                .unwrap();

        assert_eq!(status, "Set");
    }
}
