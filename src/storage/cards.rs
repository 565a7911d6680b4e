//! Credit card repository (cards.json)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{CreditCard, CreditCardId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::table::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CardData {
    #[serde(default)]
    cards: Vec<CreditCard>,
}

pub struct CardRepository {
    path: PathBuf,
    cards: Table<CreditCardId, CreditCard>,
}

impl CardRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cards: Table::new(),
        }
    }

    pub fn load(&self) -> LedgerResult<()> {
        let file_data: CardData = read_json(&self.path)?;
        debug!(count = file_data.cards.len(), "loaded credit cards");
        self.cards.replace_all(file_data.cards, |c| c.id)
    }

    pub fn save(&self) -> LedgerResult<()> {
        let mut cards = self.cards.all()?;
        cards.sort_by_key(|c| c.created_at);
        write_json_atomic(&self.path, &CardData { cards })
    }

    pub fn get(&self, id: CreditCardId) -> LedgerResult<Option<CreditCard>> {
        self.cards.get(id)
    }

    pub fn upsert(&self, card: CreditCard) -> LedgerResult<()> {
        self.cards.upsert(card.id, card)?;
        Ok(())
    }

    /// A member's active cards by name
    pub fn active_for_user(&self, user_id: UserId) -> LedgerResult<Vec<CreditCard>> {
        let mut cards = self.cards.filter(|c| c.user_id == user_id && c.is_active)?;
        cards.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_active_for_user() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CardRepository::new(temp_dir.path().join("cards.json"));
        let owner = UserId::new();

        let visa = CreditCard::new(owner, "Visa", Money::from_cents(500000), 10, 20);
        let mut old = CreditCard::new(owner, "Amex", Money::from_cents(100000), 5, 15);
        old.deactivate();
        repo.upsert(visa.clone()).unwrap();
        repo.upsert(old).unwrap();
        repo.upsert(CreditCard::new(UserId::new(), "Other", Money::zero(), 1, 10))
            .unwrap();
        repo.save().unwrap();

        let reloaded = CardRepository::new(temp_dir.path().join("cards.json"));
        reloaded.load().unwrap();
        let cards = reloaded.active_for_user(owner).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, visa.id);
    }
}
