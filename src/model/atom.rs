use super::types::Element;

/// Tetrahedral handedness as written in SMILES: `@` is anticlockwise, `@@` clockwise,
/// both viewed from the first neighbor reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chirality {
    Anticlockwise,
    Clockwise,
}

impl Chirality {
    pub fn inverted(self) -> Self {
        match self {
            Chirality::Anticlockwise => Chirality::Clockwise,
            Chirality::Clockwise => Chirality::Anticlockwise,
        }
    }

    pub fn smiles_symbol(&self) -> &'static str {
        match self {
            Chirality::Anticlockwise => "@",
            Chirality::Clockwise => "@@",
        }
    }
}

/// A neighbor slot around a stereocenter. `Implicit` stands for the implicit
/// hydrogen, or the lone pair of a three-coordinate center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StereoRef {
    Implicit,
    Atom(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetrahedralStereo {
    pub chirality: Chirality,
    /// Neighbor order the chirality is expressed against.
    pub refs: Vec<StereoRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub isotope: Option<u16>,
    pub charge: i8,
    /// Total attached hydrogens that are not explicit atoms of the graph.
    pub hydrogens: u8,
    pub aromatic: bool,
    pub stereo: Option<TetrahedralStereo>,
    pub class: Option<u32>,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            isotope: None,
            charge: 0,
            hydrogens: 0,
            aromatic: false,
            stereo: None,
            class: None,
        }
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }

    /// Mass of the atom together with its attached hydrogens.
    pub fn mass(&self) -> f64 {
        let own = match self.isotope {
            Some(mass_number) => f64::from(mass_number),
            None => self.element.atomic_mass(),
        };
        own + f64::from(self.hydrogens) * Element::H.atomic_mass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chirality_inversion_is_an_involution() {
        assert_eq!(Chirality::Clockwise.inverted(), Chirality::Anticlockwise);
        assert_eq!(Chirality::Anticlockwise.inverted().inverted(), Chirality::Anticlockwise);
        assert_eq!(Chirality::Clockwise.smiles_symbol(), "@@");
    }

    #[test]
    fn mass_includes_hydrogens_and_isotope() {
        let mut methyl = Atom::new(Element::C);
        methyl.hydrogens = 3;
        assert!((methyl.mass() - (12.011 + 3.0 * 1.008)).abs() < 1e-9);

        let mut c13 = Atom::new(Element::C);
        c13.isotope = Some(13);
        assert!((c13.mass() - 13.0).abs() < 1e-9);
    }
}
