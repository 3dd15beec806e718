//! Gender-balanced random team draw.
//!
//! The draw is a pure function of the confirmed list and a random source:
//! each gender group is shuffled on its own, the groups are interleaved by
//! remaining count, and the combined sequence is dealt round-robin. Teams
//! short of [`TEAM_SIZE`] are topped up with open slots.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::{Gender, Participant};

pub const TEAM_COUNT: usize = 4;
pub const TEAM_SIZE: usize = 6;
pub const CAPACITY: usize = TEAM_COUNT * TEAM_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot<'a> {
    Player(&'a Participant),
    Open,
}

impl<'a> Slot<'a> {
    pub fn participant(&self) -> Option<&'a Participant> {
        match self {
            Slot::Player(p) => Some(p),
            Slot::Open => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Slot::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team<'a> {
    pub number: usize,
    pub slots: Vec<Slot<'a>>,
}

impl<'a> Team<'a> {
    pub fn players(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        self.slots.iter().filter_map(Slot::participant)
    }

    pub fn open_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_open()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamDraw<'a> {
    pub teams: Vec<Team<'a>>,
}

impl<'a> TeamDraw<'a> {
    pub fn players(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        self.teams.iter().flat_map(|t| t.players())
    }

    pub fn open_slots(&self) -> usize {
        self.teams.iter().map(Team::open_slots).sum()
    }
}

/// Merges groups by always taking from the group with the most members left.
/// Equal counts go to the group that comes first in `groups`.
fn interleave_by_remaining<T>(groups: Vec<Vec<T>>) -> Vec<T> {
    let total = groups.iter().map(Vec::len).sum();
    let mut remaining: Vec<std::vec::IntoIter<T>> = groups.into_iter().map(Vec::into_iter).collect();
    let mut combined = Vec::with_capacity(total);

    while combined.len() < total {
        let mut pick = 0;
        for (idx, group) in remaining.iter().enumerate() {
            if group.len() > remaining[pick].len() {
                pick = idx;
            }
        }
        match remaining[pick].next() {
            Some(item) => combined.push(item),
            None => break,
        }
    }
    combined
}

pub fn draw_teams<'a, R>(confirmed: &'a [Participant], rng: &mut R) -> TeamDraw<'a>
where
    R: Rng + ?Sized,
{
    let eligible = &confirmed[..confirmed.len().min(CAPACITY)];

    let mut groups: Vec<Vec<&Participant>> = Vec::with_capacity(Gender::ALL.len());
    for gender in Gender::ALL {
        let mut group: Vec<&Participant> = eligible.iter().filter(|p| p.gender == gender).collect();
        group.shuffle(rng);
        groups.push(group);
    }

    let mut teams: Vec<Team<'a>> = (1..=TEAM_COUNT)
        .map(|number| Team {
            number,
            slots: Vec::with_capacity(TEAM_SIZE),
        })
        .collect();

    for (i, participant) in interleave_by_remaining(groups).into_iter().enumerate() {
        teams[i % TEAM_COUNT].slots.push(Slot::Player(participant));
    }

    for team in &mut teams {
        team.slots.resize(TEAM_SIZE, Slot::Open);
    }

    TeamDraw { teams }
}

/// Draws with a fresh thread-local generator, so repeated calls are independent.
pub fn draw(confirmed: &[Participant]) -> TeamDraw<'_> {
    draw_teams(confirmed, &mut rand::rng())
}
