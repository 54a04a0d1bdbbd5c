//! Sample data for local development.
//!
//! Enabled with `SEED_SAMPLE_DATA=true`. Each collection is seeded only while
//! it is empty, so restarting the server never duplicates records.
//!
//! Seeded accounts have no MPIN; the status follows from the missing value.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    models::{
        account::Account,
        bank_link::BankLink,
        transfer::{Transfer, TransferKind, TransferStatus},
    },
    store::{RecordStore, StoreError},
};

/// What was inserted, per collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub transactions: usize,
    pub bank_links: usize,
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn sample_accounts(now: DateTime<Utc>) -> Vec<Account> {
    [
        ("user1", "Alice Johnson", "alice@example.com", 150_050, Some("bl1")),
        ("user2", "Bob Williams", "bob@example.com", 230_075, Some("bl2")),
        ("user3", "Charlie Brown", "charlie@example.com", 85_025, Some("bl3")),
        ("user4", "Diana Prince", "diana@example.com", 320_000, Some("bl4")),
        ("user5", "Eve Davis", "eve@example.com", 45_080, None),
    ]
    .into_iter()
    .map(|(id, name, email, balance_cents, bank)| {
        let mut account = Account::new(
            id.to_string(),
            id.to_string(),
            name.to_string(),
            email.to_string(),
            String::new(),
            now,
        );
        account.balance_cents = balance_cents;
        account.linked_banks = bank.map(str::to_string).into_iter().collect();
        account
    })
    .collect()
}

fn sample_transfers() -> Vec<Transfer> {
    use TransferKind::{Received, Sent};
    use TransferStatus::{Failed, Success};

    [
        ("tx1", "user1", "user3", 10_000, Success, Sent, at(2024, 7, 29, 10, 0)),
        ("tx2", "user3", "user1", 5_000, Success, Received, at(2024, 7, 29, 11, 0)),
        ("tx3", "user2", "user4", 20_000, Failed, Sent, at(2024, 7, 28, 15, 30)),
        ("tx4", "user5", "user2", 7_500, Success, Received, at(2024, 7, 28, 9, 0)),
        ("tx5", "user1", "user5", 12_000, Success, Sent, at(2024, 7, 27, 18, 0)),
    ]
    .into_iter()
    .map(|(id, sender, receiver, amount_cents, status, kind, timestamp)| Transfer {
        id: id.to_string(),
        sender_id: sender.to_string(),
        receiver_id: receiver.to_string(),
        amount_cents,
        status,
        kind: Some(kind),
        timestamp,
    })
    .collect()
}

fn sample_bank_links(now: DateTime<Utc>) -> Vec<BankLink> {
    [
        ("bl1", "user1", "Alice Johnson", "HDFC Bank", "****1234", true),
        ("bl2", "user2", "Bob Williams", "State Bank of India", "****5678", false),
        ("bl3", "user3", "Charlie Brown", "ICICI Bank", "****9012", true),
        ("bl4", "user4", "Diana Prince", "Axis Bank", "****3456", true),
    ]
    .into_iter()
    .map(|(id, user_id, user_name, bank_name, account_number, is_verified)| BankLink {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        bank_name: bank_name.to_string(),
        account_number: account_number.to_string(),
        is_verified,
        created_at: now,
    })
    .collect()
}

/// Insert the sample records into whichever collections are empty.
pub async fn seed_sample_data(store: &dyn RecordStore) -> Result<SeedReport, StoreError> {
    let counts = store.counts().await?;
    let now = Utc::now();
    let mut report = SeedReport::default();

    if counts.users == 0 {
        for account in sample_accounts(now) {
            store.insert_account(account).await?;
            report.users += 1;
        }
    }
    if counts.transactions == 0 {
        for transfer in sample_transfers() {
            store.insert_transfer(transfer).await?;
            report.transactions += 1;
        }
    }
    if counts.bank_links == 0 {
        for link in sample_bank_links(now) {
            store.insert_bank_link(link).await?;
            report.bank_links += 1;
        }
    }

    tracing::info!(
        users = report.users,
        transactions = report.transactions,
        bank_links = report.bank_links,
        "Seeded sample data"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn seeds_once() {
        let store = MemoryStore::new();

        let first = seed_sample_data(&store).await.unwrap();
        let second = seed_sample_data(&store).await.unwrap();

        assert_eq!(
            first,
            SeedReport {
                users: 5,
                transactions: 5,
                bank_links: 4
            }
        );
        assert_eq!(second, SeedReport::default());
        assert_eq!(store.counts().await.unwrap().users, 5);
    }

    #[tokio::test]
    async fn seeded_transfers_resolve_party_names() {
        let store = MemoryStore::new();
        seed_sample_data(&store).await.unwrap();

        let transfers = store.list_transfers(None).await.unwrap();

        assert_eq!(transfers[0].transfer.id, "tx2");
        assert_eq!(transfers[0].sender_name.as_deref(), Some("Charlie Brown"));
        assert_eq!(transfers[0].receiver_name.as_deref(), Some("Alice Johnson"));
        assert_eq!(transfers.last().map(|t| t.transfer.id.as_str()), Some("tx5"));
    }
}
