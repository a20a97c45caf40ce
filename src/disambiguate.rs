// Disambiguation
//
// Reduces the candidates of one reference to a single instance. Candidates
// are split into present (reachable) and distant ones and each count is
// saturated to zero, one or many:
//
// present distant  omnipotent=no       omnipotent=yes
// 0       0        no such             no such
// 0       1        no such             the distant one
// 0       many     no such             which one (distant)
// 1       any      the present one     the present one
// many    any      which one (present) which one (present)
//
// Only present candidates are ever listed when there are any, so the player
// doesn't learn about things out of sight.

use crate::story::InstanceId;
use crate::world::World;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Zero,
    One,
    Many,
}

impl Count {
    pub fn of(n: usize) -> Self {
        match n {
            0 => Count::Zero,
            1 => Count::One,
            _ => Count::Many,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NoSuch,
    Present,
    Distant,
    WhichPresent,
    WhichDistant,
}

pub fn decide(present: Count, distant: Count, omnipotent: bool) -> Decision {
    match (present, distant, omnipotent) {
        (Count::Zero, Count::Zero, _) => Decision::NoSuch,
        (Count::Zero, _, false) => Decision::NoSuch,
        (Count::Zero, Count::One, true) => Decision::Distant,
        (Count::Zero, Count::Many, true) => Decision::WhichDistant,
        (Count::One, _, _) => Decision::Present,
        (Count::Many, _, _) => Decision::WhichPresent,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(InstanceId),
    NoSuch,
    WhichOne(Vec<InstanceId>),
}

pub fn disambiguate(world: &dyn World, candidates: &[InstanceId], omnipotent: bool) -> Resolution {
    let (present, distant): (Vec<InstanceId>, Vec<InstanceId>) =
        candidates.iter().partition(|i| world.reachable(**i));

    let decision = decide(Count::of(present.len()), Count::of(distant.len()), omnipotent);
    trace!(
        "Candidates {:?}: present {:?}, distant {:?}, omnipotent {} => {:?}",
        candidates,
        present,
        distant,
        omnipotent,
        decision
    );
    match decision {
        Decision::NoSuch => Resolution::NoSuch,
        Decision::Present => Resolution::Resolved(present[0]),
        Decision::Distant => Resolution::Resolved(distant[0]),
        Decision::WhichPresent => Resolution::WhichOne(present),
        Decision::WhichDistant => Resolution::WhichOne(distant),
    }
}
