use super::atom::{Atom, StereoRef, TetrahedralStereo};
use super::types::BondOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Configuration {
    Cis,
    Trans,
}

impl Configuration {
    pub fn flipped(self) -> Self {
        match self {
            Configuration::Cis => Configuration::Trans,
            Configuration::Trans => Configuration::Cis,
        }
    }
}

/// Geometry of a double bond, relative to one substituent on each end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleBondStereo {
    /// Neighbor of `Bond::i`.
    pub ref_i: usize,
    /// Neighbor of `Bond::j`.
    pub ref_j: usize,
    pub configuration: Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
    pub stereo: Option<DoubleBondStereo>,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        let (i, j) = if idx1 <= idx2 { (idx1, idx2) } else { (idx2, idx1) };
        Self {
            i,
            j,
            order,
            stereo: None,
        }
    }

    #[inline]
    pub fn other(&self, atom: usize) -> usize {
        if self.i == atom { self.j } else { self.i }
    }

    #[inline]
    pub fn contains(&self, atom: usize) -> bool {
        self.i == atom || self.j == atom
    }
}

/// A molecular graph with implicit hydrogens folded into the atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

/// Per-atom neighbor lists of `(neighbor, bond index)`, sorted by neighbor.
pub type Adjacency = Vec<Vec<(usize, usize)>>;

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    pub fn molecular_weight(&self) -> f64 {
        self.atoms.iter().map(Atom::mass).sum()
    }

    pub fn adjacency(&self) -> Adjacency {
        let mut adj = vec![Vec::new(); self.atoms.len()];
        for (idx, bond) in self.bonds.iter().enumerate() {
            adj[bond.i].push((bond.j, idx));
            adj[bond.j].push((bond.i, idx));
        }
        for neighbors in &mut adj {
            neighbors.sort_unstable();
        }
        adj
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        let (i, j) = if a <= b { (a, b) } else { (b, a) };
        self.bonds.iter().position(|bond| bond.i == i && bond.j == j)
    }

    /// Connected components as sorted atom index lists, ordered by their lowest atom.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let adj = self.adjacency();
        let mut seen = vec![false; self.atoms.len()];
        let mut components = Vec::new();

        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut members = Vec::new();
            while let Some(atom) = stack.pop() {
                members.push(atom);
                for &(next, _) in &adj[atom] {
                    if !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }

        components
    }

    /// Copies the given atoms and the bonds among them into a new molecule.
    ///
    /// Stereo annotations that reference atoms outside the selection are dropped.
    pub fn extract(&self, selection: &[usize]) -> Molecule {
        let mut map = vec![None; self.atoms.len()];
        for (new_idx, &old_idx) in selection.iter().enumerate() {
            map[old_idx] = Some(new_idx);
        }

        let atoms = selection
            .iter()
            .map(|&old| {
                let mut atom = self.atoms[old].clone();
                atom.stereo = atom.stereo.and_then(|stereo| remap_tetrahedral(stereo, &map));
                atom
            })
            .collect();

        let bonds = self
            .bonds
            .iter()
            .filter_map(|bond| {
                let (i, j) = (map[bond.i]?, map[bond.j]?);
                let mut out = Bond::new(i, j, bond.order);
                out.stereo = bond.stereo.and_then(|s| {
                    let (ref_i, ref_j) = (map[s.ref_i]?, map[s.ref_j]?);
                    // `Bond::new` may have swapped the ends.
                    Some(if out.i == i {
                        DoubleBondStereo { ref_i, ref_j, ..s }
                    } else {
                        DoubleBondStereo {
                            ref_i: ref_j,
                            ref_j: ref_i,
                            ..s
                        }
                    })
                });
                Some(out)
            })
            .collect();

        Molecule { atoms, bonds }
    }

    pub fn fragments(&self) -> Vec<Molecule> {
        self.components()
            .iter()
            .map(|members| self.extract(members))
            .collect()
    }
}

fn remap_tetrahedral(
    stereo: TetrahedralStereo,
    map: &[Option<usize>],
) -> Option<TetrahedralStereo> {
    let refs = stereo
        .refs
        .iter()
        .map(|r| match *r {
            StereoRef::Implicit => Some(StereoRef::Implicit),
            StereoRef::Atom(old) => map[old].map(StereoRef::Atom),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(TetrahedralStereo {
        chirality: stereo.chirality,
        refs,
    })
}
