use crate::domain::card::normalize_text;
use crate::domain::{BoardTitle, Card, CardId, Store};
use crate::error::{BoardError, Result};
use std::sync::Arc;

/// Appends a new card with a fresh id to the end of a board
///
/// Text is trimmed; blank text is rejected with
/// [`BoardError::InvalidInsertion`] before anything else is checked.
pub fn add_card(store: &Store, board: &str, text: &str) -> Result<Store> {
    let text = normalize_text(text).ok_or(BoardError::InvalidInsertion)?;
    if !store.contains_board(board) {
        return Err(BoardError::BoardNotFound(board.to_string()));
    }

    let mut next = store.clone();
    let id = next.issue_card_id()?;
    tracing::debug!(board, card_id = %id, "card added");

    next.cards_mut(board)
        .ok_or_else(|| BoardError::BoardNotFound(board.to_string()))?
        .push(Card::new(id, text));
    Ok(next)
}

/// Removes a card from whichever board holds it
pub fn remove_card(store: &Store, id: &CardId) -> Result<Store> {
    let (board, index) = locate(store, id)?;

    let mut next = store.clone();
    if let Some(cards) = next.cards_mut(board.as_str()) {
        cards.remove(index);
    }
    tracing::debug!(board = %board, card_id = %id, "card removed");
    Ok(next)
}

/// Replaces a card's text in place, keeping its id and rank
pub fn edit_card_text(store: &Store, id: &CardId, text: &str) -> Result<Store> {
    let text = normalize_text(text).ok_or(BoardError::InvalidInsertion)?;
    let (board, index) = locate(store, id)?;

    let mut next = store.clone();
    if let Some(cards) = next.cards_mut(board.as_str()) {
        cards[index] = cards[index].with_text(text);
    }
    Ok(next)
}

fn locate(store: &Store, id: &CardId) -> Result<(BoardTitle, usize)> {
    store
        .find_card(id)
        .map(|(board, index, _)| (board.clone(), index))
        .ok_or_else(|| BoardError::CardNotFound(id.to_string()))
}

/// Appends a new, empty board to the end of the board order
pub fn add_board(store: &Store, title: &str) -> Result<Store> {
    let title = BoardTitle::new(title)?;
    if store.contains_board(title.as_str()) {
        return Err(BoardError::DuplicateBoard(title.to_string()));
    }

    let mut next = store.clone();
    next.order_mut().push(title.clone());
    next.insert_board(title, Arc::new(Vec::new()));
    Ok(next)
}

/// Removes a board together with every card on it
pub fn remove_board(store: &Store, title: &str) -> Result<Store> {
    if !store.contains_board(title) {
        return Err(BoardError::BoardNotFound(title.to_string()));
    }

    let mut next = store.clone();
    next.order_mut().retain(|t| t.as_str() != title);
    let dropped = next.take_board(title).map_or(0, |cards| cards.len());
    tracing::debug!(board = title, dropped_cards = dropped, "board removed");
    Ok(next)
}

/// Renames a board, keeping its rank and its cards
pub fn rename_board(store: &Store, from: &str, to: &str) -> Result<Store> {
    let to = BoardTitle::new(to)?;
    if !store.contains_board(from) {
        return Err(BoardError::BoardNotFound(from.to_string()));
    }
    if to.as_str() == from {
        return Ok(store.clone());
    }
    if store.contains_board(to.as_str()) {
        return Err(BoardError::DuplicateBoard(to.to_string()));
    }

    let mut next = store.clone();
    if let Some(slot) = next.order_mut().iter_mut().find(|t| t.as_str() == from) {
        *slot = to.clone();
    }
    let cards = next
        .take_board(from)
        .ok_or_else(|| BoardError::BoardNotFound(from.to_string()))?;
    next.insert_board(to, cards);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoardConfig;
    use std::collections::HashSet;

    fn store() -> Store {
        Store::new(&BoardConfig::new(["A", "B"])).unwrap()
    }

    fn texts<'a>(store: &'a Store, board: &str) -> Vec<&'a str> {
        store
            .cards(board)
            .unwrap()
            .iter()
            .map(|card| card.text.as_str())
            .collect()
    }

    #[test]
    fn test_add_card_appends() {
        let next = add_card(&store(), "A", "first").unwrap();
        let next = add_card(&next, "A", "  second  ").unwrap();

        assert_eq!(texts(&next, "A"), vec!["first", "second"]);
        assert_eq!(next.cards("A").unwrap()[0].id.as_str(), "CARD1");
        assert_eq!(next.cards("A").unwrap()[1].id.as_str(), "CARD2");
    }

    #[test]
    fn test_add_card_leaves_input_untouched() {
        let before = store();
        let after = add_card(&before, "A", "task").unwrap();

        assert_eq!(before.card_count(), 0);
        assert_eq!(after.card_count(), 1);
        assert!(Arc::ptr_eq(
            before.shared_cards("B").unwrap(),
            after.shared_cards("B").unwrap()
        ));
    }

    #[test]
    fn test_add_card_rejects_blank_text() {
        let before = store();

        assert!(matches!(
            add_card(&before, "B", ""),
            Err(BoardError::InvalidInsertion)
        ));
        assert!(matches!(
            add_card(&before, "B", "   "),
            Err(BoardError::InvalidInsertion)
        ));
        assert_eq!(before.next_card_number(), 1);
    }

    #[test]
    fn test_add_card_with_exhausted_counter_fails() {
        let json = r#"{
            "boards": [{ "title": "A", "cards": [] }],
            "card_id_prefix": "CARD",
            "next_card_number": 18446744073709551615
        }"#;
        let loaded = Store::from_json(json).unwrap();

        assert!(matches!(
            add_card(&loaded, "A", "one more"),
            Err(BoardError::InvariantViolation(_))
        ));
        assert_eq!(loaded.card_count(), 0);
    }

    #[test]
    fn test_add_card_unknown_board() {
        assert!(matches!(
            add_card(&store(), "Missing", "task"),
            Err(BoardError::BoardNotFound(_))
        ));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let mut current = store();
        for i in 0..50 {
            let board = if i % 2 == 0 { "A" } else { "B" };
            current = add_card(&current, board, "card").unwrap();
        }

        let ids: HashSet<_> = current
            .boards()
            .flat_map(|(_, cards)| cards.iter().map(|c| c.id.clone()))
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let next = add_card(&store(), "A", "one").unwrap();
        let id = next.cards("A").unwrap()[0].id.clone();
        let next = remove_card(&next, &id).unwrap();
        let next = add_card(&next, "A", "two").unwrap();

        assert_ne!(next.cards("A").unwrap()[0].id, id);
    }

    #[test]
    fn test_remove_card() {
        let mut current = store();
        for text in ["x", "y", "z"] {
            current = add_card(&current, "A", text).unwrap();
        }
        let next = remove_card(&current, &CardId::new(2)).unwrap();

        assert_eq!(texts(&next, "A"), vec!["x", "z"]);
        assert!(matches!(
            remove_card(&next, &CardId::new(2)),
            Err(BoardError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_edit_card_text() {
        let current = add_card(&store(), "B", "draft").unwrap();
        let next = edit_card_text(&current, &CardId::new(1), "final").unwrap();

        assert_eq!(texts(&next, "B"), vec!["final"]);
        assert!(edit_card_text(&current, &CardId::new(1), " ").is_err());
    }

    #[test]
    fn test_add_board() {
        let next = add_board(&store(), "C").unwrap();

        let order: Vec<_> = next.board_order().iter().map(|t| t.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(next.cards("C"), Some(&[][..]));
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_add_board_rejects_duplicates_and_blank() {
        assert!(matches!(
            add_board(&store(), " A "),
            Err(BoardError::DuplicateBoard(_))
        ));
        assert!(matches!(
            add_board(&store(), ""),
            Err(BoardError::InvalidBoardTitle(_))
        ));
    }

    #[test]
    fn test_remove_board_drops_its_cards() {
        let current = add_card(&store(), "A", "gone").unwrap();
        let next = remove_board(&current, "A").unwrap();

        assert!(!next.contains_board("A"));
        assert_eq!(next.board_count(), 1);
        assert_eq!(next.card_count(), 0);
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_rename_board_keeps_rank_and_cards() {
        let current = add_card(&store(), "A", "keep").unwrap();
        let next = rename_board(&current, "A", "Renamed").unwrap();

        let order: Vec<_> = next.board_order().iter().map(|t| t.as_str()).collect();
        assert_eq!(order, vec!["Renamed", "B"]);
        assert!(Arc::ptr_eq(
            next.shared_cards("Renamed").unwrap(),
            current.shared_cards("A").unwrap()
        ));
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_rename_board_conflicts() {
        assert!(matches!(
            rename_board(&store(), "A", "B"),
            Err(BoardError::DuplicateBoard(_))
        ));
        assert!(matches!(
            rename_board(&store(), "Missing", "C"),
            Err(BoardError::BoardNotFound(_))
        ));
        assert_eq!(rename_board(&store(), "A", "A").unwrap(), store());
    }
}
