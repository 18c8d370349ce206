//! Stereo bookkeeping shared by the parser, the ranking and the writer.
//!
//! Double-bond geometry is written in SMILES as `/` and `\` on the single
//! bonds next to the double bond. Internally it is held as a cis/trans
//! relation between one substituent on each end ([`DoubleBondStereo`]); the
//! helpers here translate between the two forms.

use std::collections::VecDeque;

use crate::model::atom::StereoRef;
use crate::model::molecule::{Adjacency, Configuration, Molecule};
use crate::model::types::BondOrder;

/// Double bonds in rings smaller than this cannot carry E/Z geometry.
const MIN_STEREO_RING_SIZE: usize = 8;

/// Directional single-bond marker: `/` is `Up`, `\` is `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondDirection {
    Up,
    Down,
}

impl BondDirection {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '/' => Some(BondDirection::Up),
            '\\' => Some(BondDirection::Down),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            BondDirection::Up => '/',
            BondDirection::Down => '\\',
        }
    }
}

/// Position of a substituent relative to the double-bond atom it hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Above => Side::Below,
            Side::Below => Side::Above,
        }
    }
}

/// Side of the neighbor as seen from `center`, for a bond written with
/// `direction`. `center_first` tells whether `center` precedes the neighbor
/// in the string.
pub fn side_of(direction: BondDirection, center_first: bool) -> Side {
    match (direction, center_first) {
        (BondDirection::Up, true) | (BondDirection::Down, false) => Side::Above,
        (BondDirection::Up, false) | (BondDirection::Down, true) => Side::Below,
    }
}

/// Inverse of [`side_of`].
pub fn direction_for(side: Side, center_first: bool) -> BondDirection {
    match (side, center_first) {
        (Side::Above, true) | (Side::Below, false) => BondDirection::Up,
        (Side::Above, false) | (Side::Below, true) => BondDirection::Down,
    }
}

pub fn configuration_of(side_i: Side, side_j: Side) -> Configuration {
    if side_i == side_j {
        Configuration::Cis
    } else {
        Configuration::Trans
    }
}

/// Number of inversions modulo two needed to turn `from` into `to`.
///
/// Both slices must hold the same elements.
pub fn permutation_is_odd<T: PartialEq>(from: &[T], to: &[T]) -> bool {
    let positions: Vec<usize> = to
        .iter()
        .filter_map(|item| from.iter().position(|x| x == item))
        .collect();
    let mut inversions = 0usize;
    for a in 0..positions.len() {
        for b in a + 1..positions.len() {
            if positions[a] > positions[b] {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 1
}

/// Size of the smallest ring through bond `bond`, or `None` for acyclic bonds.
pub fn smallest_ring_through(mol: &Molecule, adj: &Adjacency, bond: usize) -> Option<usize> {
    let (start, goal) = (mol.bonds[bond].i, mol.bonds[bond].j);
    let mut dist = vec![usize::MAX; mol.atom_count()];
    let mut queue = VecDeque::from([start]);
    dist[start] = 0;

    while let Some(atom) = queue.pop_front() {
        for &(next, via) in &adj[atom] {
            if via == bond || dist[next] != usize::MAX {
                continue;
            }
            dist[next] = dist[atom] + 1;
            if next == goal {
                return Some(dist[next] + 1);
            }
            queue.push_back(next);
        }
    }
    None
}

/// Drops stereo annotations that do not describe a real stereo element:
/// tetrahedral centers with equivalent neighbors, and double bonds with
/// equivalent or missing substituents on an end, or inside small rings.
///
/// A center with exactly one pair of equivalent neighbors stays stereogenic
/// when both branches of the pair lead to another stereocenter. That covers
/// cis/trans across a ring (`C[C@H]1CC[C@@H](C)CC1`) and pseudo-asymmetric
/// centers between two stereocenters.
///
/// `classes` are graph-symmetry classes, equal for interchangeable atoms.
pub fn prune(mol: &mut Molecule, adj: &Adjacency, classes: &[usize]) {
    let mut paired: Vec<(usize, [usize; 2])> = Vec::new();
    for (idx, atom) in mol.atoms.iter_mut().enumerate() {
        let Some(stereo) = &atom.stereo else {
            continue;
        };
        if atom.hydrogens > 1 || stereo.refs.len() != 4 {
            atom.stereo = None;
            continue;
        }
        match neighbor_symmetry(&stereo.refs, classes) {
            NeighborSymmetry::Distinct => {}
            NeighborSymmetry::Pair(pair) => paired.push((idx, pair)),
            NeighborSymmetry::Degenerate => atom.stereo = None,
        }
    }

    loop {
        let dropped: Vec<usize> = paired
            .iter()
            .filter(|(center, pair)| {
                !pair
                    .iter()
                    .all(|&start| reaches_stereocenter(mol, adj, *center, start))
            })
            .map(|&(center, _)| center)
            .collect();
        if dropped.is_empty() {
            break;
        }
        for &center in &dropped {
            mol.atoms[center].stereo = None;
        }
        paired.retain(|(center, _)| !dropped.contains(center));
    }

    for idx in 0..mol.bonds.len() {
        if mol.bonds[idx].stereo.is_none() {
            continue;
        }
        let keep = mol.bonds[idx].order == BondOrder::Double
            && end_is_stereogenic(mol, adj, classes, idx, mol.bonds[idx].i)
            && end_is_stereogenic(mol, adj, classes, idx, mol.bonds[idx].j)
            && smallest_ring_through(mol, adj, idx).is_none_or(|size| size >= MIN_STEREO_RING_SIZE);
        if !keep {
            mol.bonds[idx].stereo = None;
        }
    }
}

enum NeighborSymmetry {
    Distinct,
    Pair([usize; 2]),
    Degenerate,
}

fn neighbor_symmetry(refs: &[StereoRef], classes: &[usize]) -> NeighborSymmetry {
    let atoms: Vec<usize> = refs
        .iter()
        .filter_map(|r| match r {
            StereoRef::Implicit => None,
            StereoRef::Atom(idx) => Some(*idx),
        })
        .collect();
    let mut pairs = Vec::new();
    for a in 0..atoms.len() {
        for b in a + 1..atoms.len() {
            if classes[atoms[a]] == classes[atoms[b]] {
                pairs.push([atoms[a], atoms[b]]);
            }
        }
    }
    match pairs.as_slice() {
        [] => NeighborSymmetry::Distinct,
        [pair] => NeighborSymmetry::Pair(*pair),
        _ => NeighborSymmetry::Degenerate,
    }
}

/// Whether a tetrahedral stereocenter other than `center` is reachable from
/// `start` without passing through `center`.
fn reaches_stereocenter(mol: &Molecule, adj: &Adjacency, center: usize, start: usize) -> bool {
    let mut seen = vec![false; mol.atom_count()];
    seen[center] = true;
    seen[start] = true;
    let mut queue = VecDeque::from([start]);

    while let Some(atom) = queue.pop_front() {
        if mol.atoms[atom].stereo.is_some() {
            return true;
        }
        for &(next, _) in &adj[atom] {
            if !seen[next] {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    false
}

fn end_is_stereogenic(
    mol: &Molecule,
    adj: &Adjacency,
    classes: &[usize],
    bond: usize,
    end: usize,
) -> bool {
    let substituents: Vec<usize> = adj[end]
        .iter()
        .filter(|&&(_, via)| via != bond)
        .map(|&(nb, _)| nb)
        .collect();
    match substituents.as_slice() {
        [_] => mol.atoms[end].hydrogens <= 1,
        [a, b] => classes[*a] != classes[*b],
        _ => false,
    }
}
