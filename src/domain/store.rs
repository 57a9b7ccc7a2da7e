use crate::domain::board::{BoardConfig, BoardTitle};
use crate::domain::card::{Card, CardId};
use crate::domain::drag::BOARD_ORDER_KEY;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Snapshot of the whole task board
///
/// Board order and each board's cards are held behind `Arc`, so cloning a
/// snapshot is cheap and a sequence the engine did not touch stays
/// pointer-equal to the one in the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreView", into = "StoreView")]
pub struct Store {
    order: Arc<Vec<BoardTitle>>,
    boards: HashMap<BoardTitle, Arc<Vec<Card>>>,
    card_id_prefix: String,
    next_card_number: u64,
}

impl Store {
    /// Builds the initial snapshot: every configured board, no cards
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let titles = config.titles()?;
        Ok(Self::with_titles(titles, config.card_id_prefix.clone()))
    }

    fn with_titles(titles: Vec<BoardTitle>, card_id_prefix: String) -> Self {
        let boards = titles
            .iter()
            .map(|title| (title.clone(), Arc::new(Vec::new())))
            .collect();
        Self {
            order: Arc::new(titles),
            boards,
            card_id_prefix,
            next_card_number: 1,
        }
    }

    /// Board titles in display order
    pub fn board_order(&self) -> &[BoardTitle] {
        &self.order
    }

    /// Cards of a board in rank order
    pub fn cards(&self, title: &str) -> Option<&[Card]> {
        self.boards.get(title).map(|cards| cards.as_slice())
    }

    /// Shared handle to a board's card sequence, for identity comparison
    pub fn shared_cards(&self, title: &str) -> Option<&Arc<Vec<Card>>> {
        self.boards.get(title)
    }

    /// Shared handle to the board order, for identity comparison
    pub fn shared_order(&self) -> &Arc<Vec<BoardTitle>> {
        &self.order
    }

    /// Iterates boards with their cards in display order
    pub fn boards(&self) -> impl Iterator<Item = (&BoardTitle, &[Card])> + '_ {
        self.order.iter().filter_map(move |title| {
            self.boards
                .get(title)
                .map(|cards| (title, cards.as_slice()))
        })
    }

    pub fn contains_board(&self, title: &str) -> bool {
        self.boards.contains_key(title)
    }

    pub fn board_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of cards across every board
    pub fn card_count(&self) -> usize {
        self.boards.values().map(|cards| cards.len()).sum()
    }

    /// Locates a card by id, returning its board and rank
    pub fn find_card(&self, id: &CardId) -> Option<(&BoardTitle, usize, &Card)> {
        self.boards().find_map(|(title, cards)| {
            cards
                .iter()
                .enumerate()
                .find(|(_, card)| &card.id == id)
                .map(|(index, card)| (title, index, card))
        })
    }

    pub fn next_card_number(&self) -> u64 {
        self.next_card_number
    }

    /// Issues a fresh card id, skipping any number already in use
    pub(crate) fn issue_card_id(&mut self) -> Result<CardId> {
        loop {
            let number = self.next_card_number;
            self.next_card_number = number.checked_add(1).ok_or_else(|| {
                BoardError::InvariantViolation("card id counter exhausted".to_string())
            })?;
            let id = CardId::with_prefix(&self.card_id_prefix, number);
            if self.find_card(&id).is_none() {
                return Ok(id);
            }
        }
    }

    /// Mutable access to a board's cards, copying the sequence if shared
    pub(crate) fn cards_mut(&mut self, title: &str) -> Option<&mut Vec<Card>> {
        self.boards.get_mut(title).map(Arc::make_mut)
    }

    /// Mutable access to the board order, copying it if shared
    pub(crate) fn order_mut(&mut self) -> &mut Vec<BoardTitle> {
        Arc::make_mut(&mut self.order)
    }

    pub(crate) fn insert_board(&mut self, title: BoardTitle, cards: Arc<Vec<Card>>) {
        self.boards.insert(title, cards);
    }

    pub(crate) fn take_board(&mut self, title: &str) -> Option<Arc<Vec<Card>>> {
        self.boards.remove(title)
    }

    /// Checks the snapshot invariants
    ///
    /// Card ids are unique across all boards, board order and board mapping
    /// name exactly the same titles, no card text is blank, and the id
    /// prefix yields parseable ids.
    pub fn validate(&self) -> Result<()> {
        if !CardId::is_valid_prefix(&self.card_id_prefix) {
            return Err(BoardError::InvariantViolation(format!(
                "card id prefix must be ASCII letters, got '{}'",
                self.card_id_prefix
            )));
        }

        let mut titles = HashSet::with_capacity(self.order.len());
        for title in self.order.iter() {
            if title.as_str().trim().is_empty() || title.as_str() == BOARD_ORDER_KEY {
                return Err(BoardError::InvariantViolation(format!(
                    "unaddressable board title '{}'",
                    title
                )));
            }
            if !titles.insert(title) {
                return Err(BoardError::InvariantViolation(format!(
                    "board '{}' appears twice in board order",
                    title
                )));
            }
            if !self.boards.contains_key(title) {
                return Err(BoardError::InvariantViolation(format!(
                    "board '{}' is ordered but has no cards entry",
                    title
                )));
            }
        }
        if let Some(orphan) = self.boards.keys().find(|title| !titles.contains(title)) {
            return Err(BoardError::InvariantViolation(format!(
                "board '{}' is missing from board order",
                orphan
            )));
        }

        let mut ids = HashSet::new();
        for (title, cards) in self.boards() {
            for card in cards {
                if !ids.insert(&card.id) {
                    return Err(BoardError::InvariantViolation(format!(
                        "duplicate card id {} (seen again in '{}')",
                        card.id, title
                    )));
                }
                if card.text.trim().is_empty() {
                    return Err(BoardError::InvariantViolation(format!(
                        "card {} has empty text",
                        card.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Ordered JSON view for the rendering side
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Store {
    fn default() -> Self {
        let config = BoardConfig::default();
        let titles = config
            .boards
            .iter()
            .filter_map(|title| BoardTitle::new(title).ok())
            .collect();
        Self::with_titles(titles, config.card_id_prefix)
    }
}

/// Serialized form: boards as an ordered list rather than a map
#[derive(Serialize, Deserialize)]
struct StoreView {
    boards: Vec<BoardView>,
    card_id_prefix: String,
    next_card_number: u64,
}

#[derive(Serialize, Deserialize)]
struct BoardView {
    title: BoardTitle,
    cards: Vec<Card>,
}

impl From<Store> for StoreView {
    fn from(store: Store) -> Self {
        let boards = store
            .boards()
            .map(|(title, cards)| BoardView {
                title: title.clone(),
                cards: cards.to_vec(),
            })
            .collect();
        Self {
            boards,
            card_id_prefix: store.card_id_prefix,
            next_card_number: store.next_card_number,
        }
    }
}

impl TryFrom<StoreView> for Store {
    type Error = BoardError;

    fn try_from(view: StoreView) -> Result<Self> {
        let mut order = Vec::with_capacity(view.boards.len());
        let mut boards = HashMap::with_capacity(view.boards.len());
        for board in view.boards {
            order.push(board.title.clone());
            boards.insert(board.title, Arc::new(board.cards));
        }
        let store = Self {
            order: Arc::new(order),
            boards,
            card_id_prefix: view.card_id_prefix,
            next_card_number: view.next_card_number.max(1),
        };
        store.validate()?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(boards: &[(&str, &[&str])]) -> Store {
        let config = BoardConfig::new(boards.iter().map(|(title, _)| *title));
        let mut store = Store::new(&config).unwrap();
        for (title, texts) in boards {
            for text in *texts {
                let id = store.issue_card_id().unwrap();
                store
                    .cards_mut(title)
                    .unwrap()
                    .push(Card::new(id, text.to_string()));
            }
        }
        store
    }

    #[test]
    fn test_store_creation() {
        let store = Store::new(&BoardConfig::default()).unwrap();

        assert_eq!(store.board_count(), 3);
        assert_eq!(store.card_count(), 0);
        assert_eq!(store.next_card_number(), 1);
        assert!(store.contains_board("Doing"));
        assert_eq!(store.cards("Done"), Some(&[][..]));
        assert!(store.validate().is_ok());
    }

    #[test]
    fn test_default_matches_default_config() {
        assert_eq!(Store::default(), Store::new(&BoardConfig::default()).unwrap());
    }

    #[test]
    fn test_boards_iterates_in_display_order() {
        let store = store_with(&[("B", &["b1"]), ("A", &[]), ("C", &["c1", "c2"])]);
        let titles: Vec<_> = store.boards().map(|(t, _)| t.as_str()).collect();

        assert_eq!(titles, vec!["B", "A", "C"]);
        assert_eq!(store.card_count(), 3);
    }

    #[test]
    fn test_issue_card_id_is_monotonic() {
        let mut store = Store::default();

        assert_eq!(store.issue_card_id().unwrap().as_str(), "CARD1");
        assert_eq!(store.issue_card_id().unwrap().as_str(), "CARD2");
        assert_eq!(store.next_card_number(), 3);
    }

    #[test]
    fn test_issue_card_id_skips_ids_in_use() {
        let mut store = Store::default();
        store
            .cards_mut("To Do")
            .unwrap()
            .push(Card::new(CardId::new(1), "imported".to_string()));

        assert_eq!(store.issue_card_id().unwrap().as_str(), "CARD2");
    }

    #[test]
    fn test_issue_card_id_reports_exhausted_counter() {
        let json = r#"{
            "boards": [{ "title": "A", "cards": [] }],
            "card_id_prefix": "CARD",
            "next_card_number": 18446744073709551615
        }"#;
        let mut store = Store::from_json(json).unwrap();

        assert!(matches!(
            store.issue_card_id(),
            Err(BoardError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_prefix() {
        for prefix in ["", "c-1", "C2"] {
            let json = format!(
                r#"{{ "boards": [{{ "title": "A", "cards": [] }}], "card_id_prefix": "{}", "next_card_number": 1 }}"#,
                prefix
            );
            assert!(matches!(
                Store::from_json(&json),
                Err(BoardError::SerializationError(_))
            ));
        }
    }

    #[test]
    fn test_find_card() {
        let store = store_with(&[("A", &["a1", "a2"]), ("B", &["b1"])]);

        let (title, index, card) = store.find_card(&CardId::new(3)).unwrap();
        assert_eq!(title.as_str(), "B");
        assert_eq!(index, 0);
        assert_eq!(card.text, "b1");

        assert!(store.find_card(&CardId::new(99)).is_none());
    }

    #[test]
    fn test_cards_mut_copies_shared_sequence() {
        let before = store_with(&[("A", &["a1"]), ("B", &["b1"])]);
        let mut after = before.clone();
        after.cards_mut("A").unwrap().clear();

        assert_eq!(before.cards("A").unwrap().len(), 1);
        assert!(!Arc::ptr_eq(
            before.shared_cards("A").unwrap(),
            after.shared_cards("A").unwrap()
        ));
        assert!(Arc::ptr_eq(
            before.shared_cards("B").unwrap(),
            after.shared_cards("B").unwrap()
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut store = store_with(&[("A", &["a1"]), ("B", &[])]);
        let copy = store.cards("A").unwrap()[0].clone();
        store.cards_mut("B").unwrap().push(copy);

        assert!(matches!(
            store.validate(),
            Err(BoardError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_orphans() {
        let mut store = store_with(&[("A", &[]), ("B", &[])]);
        store.order_mut().retain(|title| title.as_str() != "B");
        assert!(store.validate().is_err());

        let mut store = store_with(&[("A", &[])]);
        store.take_board("A");
        assert!(store.validate().is_err());
    }

    #[test]
    fn test_json_view_is_ordered() {
        let store = store_with(&[("Z", &["z1"]), ("A", &["a1"])]);
        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();

        assert_eq!(value["boards"][0]["title"], "Z");
        assert_eq!(value["boards"][0]["cards"][0]["text"], "z1");
        assert_eq!(value["boards"][1]["title"], "A");
        assert_eq!(value["next_card_number"], 3);
    }

    #[test]
    fn test_from_json_validates() {
        let store = store_with(&[("A", &["a1"]), ("B", &["b1"])]);
        let restored = Store::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored, store);

        let duplicated = r#"{
            "boards": [
                { "title": "A", "cards": [] },
                { "title": "A", "cards": [] }
            ],
            "card_id_prefix": "CARD",
            "next_card_number": 1
        }"#;
        assert!(Store::from_json(duplicated).is_err());
    }
}
