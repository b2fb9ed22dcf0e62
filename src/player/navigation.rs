use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Pick the catalog index to play after `current`.
///
/// Shuffle chooses uniformly among every other index (needs at least two
/// tracks and a current one). Otherwise step by one with wraparound; with no
/// current track forward starts at the first track and backward at the last.
pub fn pick_index<R: Rng + ?Sized>(
    current: Option<usize>,
    len: usize,
    direction: Direction,
    shuffle: bool,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match current {
        Some(cur) if shuffle && len >= 2 => {
            let r = rng.random_range(0..len - 1);
            Some(if r >= cur { r + 1 } else { r })
        }
        None if shuffle => Some(rng.random_range(0..len)),
        Some(cur) => Some(match direction {
            Direction::Forward => (cur + 1) % len,
            Direction::Backward => (cur + len - 1) % len,
        }),
        None => Some(match direction {
            Direction::Forward => 0,
            Direction::Backward => len - 1,
        }),
    }
}
