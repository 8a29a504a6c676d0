/// Partner of `rank` during `phase`, or `None` when the neighbour would fall
/// outside `[0, participants)`.
///
/// Even phases pair (0,1), (2,3), ...; odd phases pair (1,2), (3,4), ...
pub fn partner(phase: usize, rank: usize, participants: usize) -> Option<usize> {
    if rank >= participants {
        return None;
    }

    let step_up = (phase % 2 == 0) == (rank % 2 == 0);
    if step_up {
        let up = rank + 1;
        if up < participants {
            Some(up)
        } else {
            None
        }
    } else {
        rank.checked_sub(1)
    }
}

/// All `(low, high)` rank pairs that exchange during `phase`.
pub fn pairs(phase: usize, participants: usize) -> Vec<(usize, usize)> {
    (0..participants)
        .filter_map(|rank| match partner(phase, rank, participants) {
            Some(other) if rank < other => Some((rank, other)),
            _ => None,
        })
        .collect()
}
