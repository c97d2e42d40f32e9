use crate::operation::Operation;
use crate::transform::Side;

/// Merge two sequentially applied batches into one.
///
/// Nothing is collapsed: both batches are kept in order and the document engine
/// lets later writes land over earlier ones.
pub fn compose(ops1: &[Operation], ops2: &[Operation]) -> Vec<Operation> {
    ops1.iter().chain(ops2).cloned().collect()
}

/// Transform two concurrent batches against each other.
///
/// Returns `(ops1', ops2')` where `ops1'` applies after `ops2` and `ops2'` applies after
/// `ops1`. `side` belongs to `ops1`; `ops2` is transformed with the opposite side.
/// Both outputs have the same length as their inputs: tombstones stay in place.
pub fn transform_x(
    ops1: &[Operation],
    ops2: &[Operation],
    side: Side,
) -> (Vec<Operation>, Vec<Operation>) {
    let mut others = ops2.to_vec();
    let mut transformed = Vec::with_capacity(ops1.len());

    for op in ops1 {
        let mut current = op.clone();
        for other in others.iter_mut() {
            let next = current.transform_against(other, side);
            let rebased = other.transform_against(&current, side.opposite());
            current = next;
            *other = rebased;
        }
        transformed.push(current);
    }

    (transformed, others)
}

/// Transform `ops1` so it can be applied after the concurrent batch `ops2`
pub fn transform_batch(ops1: &[Operation], ops2: &[Operation], side: Side) -> Vec<Operation> {
    transform_x(ops1, ops2, side).0
}
