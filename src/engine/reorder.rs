use crate::domain::{ContainerKey, DragLocation, DragResult, DraggedKind, Store};
use crate::error::{BoardError, Result};

/// Moves an element to a new rank inside one sequence
///
/// `to` is read against the sequence after the element has been removed,
/// which is how the drag layer reports final positions. A `to` past the end
/// is clamped to an append. Returns the rank the element landed at.
pub fn reorder_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<usize> {
    let moved = take(items, from)?;
    Ok(put(items, to, moved))
}

/// Moves an element from one sequence into another
///
/// The destination is untouched by the removal, so `to` is read against it
/// as-is. Returns the rank the element landed at.
pub fn move_between<T>(
    source: &mut Vec<T>,
    from: usize,
    destination: &mut Vec<T>,
    to: usize,
) -> Result<usize> {
    let moved = take(source, from)?;
    Ok(put(destination, to, moved))
}

fn take<T>(items: &mut Vec<T>, index: usize) -> Result<T> {
    if index >= items.len() {
        return Err(BoardError::malformed(format!(
            "source index {} out of range for {} items",
            index,
            items.len()
        )));
    }
    Ok(items.remove(index))
}

fn put<T>(items: &mut Vec<T>, index: usize, item: T) -> usize {
    let landed = index.min(items.len());
    if landed != index {
        tracing::debug!(
            requested = index,
            landed,
            "destination index past end, appending"
        );
    }
    items.insert(landed, item);
    landed
}

/// Computes the store that results from a completed drag gesture
///
/// A gesture with no destination leaves the store as it was. Board drags
/// only touch the board order; card drags only touch the card sequences of
/// the source and destination boards. Every other sequence in the returned
/// store is shared with the input.
///
/// # Errors
/// Returns [`BoardError::MalformedDragEvent`] when the event names a
/// container of the wrong kind, a board that does not exist, or a source
/// index outside its sequence. The input store is never modified.
///
/// # Examples
/// ```
/// use taskboard_core::domain::{BoardConfig, BoardTitle, DragResult, Store};
/// use taskboard_core::engine::{add_card, apply_drag_result};
///
/// let store = Store::new(&BoardConfig::new(["Todo"])).unwrap();
/// let store = add_card(&store, "Todo", "x").unwrap();
/// let store = add_card(&store, "Todo", "y").unwrap();
/// let store = add_card(&store, "Todo", "z").unwrap();
///
/// let todo = BoardTitle::new("Todo").unwrap();
/// let event = DragResult::card(todo.clone(), 0, todo, 2);
/// let next = apply_drag_result(&store, &event).unwrap();
///
/// let texts: Vec<_> = next.cards("Todo").unwrap().iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(texts, vec!["y", "z", "x"]);
/// ```
pub fn apply_drag_result(store: &Store, event: &DragResult) -> Result<Store> {
    let Some(destination) = &event.destination else {
        tracing::debug!(
            kind = ?event.dragged_kind,
            source = %event.source.container_key,
            "drag ended without a destination"
        );
        return Ok(store.clone());
    };

    match event.dragged_kind {
        DraggedKind::Board => move_board(store, &event.source, destination),
        DraggedKind::Card => move_card(store, &event.source, destination),
    }
}

/// Reorders the board order; the destination container is not consulted
fn move_board(store: &Store, source: &DragLocation, destination: &DragLocation) -> Result<Store> {
    if source.container_key != ContainerKey::BoardOrder {
        return Err(BoardError::malformed(format!(
            "board drag must start in the board order, not '{}'",
            source.container_key
        )));
    }

    let mut next = store.clone();
    let landed = reorder_within(next.order_mut(), source.index, destination.index)?;

    tracing::debug!(from = source.index, to = landed, "board reordered");
    Ok(next)
}

fn move_card(store: &Store, source: &DragLocation, destination: &DragLocation) -> Result<Store> {
    let from_board = card_container(store, &source.container_key)?;
    let to_board = card_container(store, &destination.container_key)?;

    let mut next = store.clone();
    let landed = if from_board == to_board {
        let cards = next
            .cards_mut(from_board)
            .ok_or_else(|| BoardError::BoardNotFound(from_board.to_string()))?;
        reorder_within(cards, source.index, destination.index)?
    } else {
        // Pull the card first so a bad source index leaves both boards alone
        let moved = {
            let cards = next
                .cards_mut(from_board)
                .ok_or_else(|| BoardError::BoardNotFound(from_board.to_string()))?;
            take(cards, source.index)?
        };
        let cards = next
            .cards_mut(to_board)
            .ok_or_else(|| BoardError::BoardNotFound(to_board.to_string()))?;
        put(cards, destination.index, moved)
    };

    tracing::debug!(
        from_board,
        from = source.index,
        to_board,
        to = landed,
        "card moved"
    );
    Ok(next)
}

/// Resolves a card drag container to an existing board title
fn card_container<'a>(store: &Store, key: &'a ContainerKey) -> Result<&'a str> {
    match key {
        ContainerKey::BoardOrder => Err(BoardError::malformed(
            "card drag cannot use the board order as its container",
        )),
        ContainerKey::Board(title) if store.contains_board(title.as_str()) => Ok(title.as_str()),
        ContainerKey::Board(title) => Err(BoardError::malformed(format!(
            "unknown board '{}'",
            title
        ))),
    }
}
