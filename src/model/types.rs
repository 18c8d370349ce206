use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

macro_rules! periodic_table {
    ($($variant:ident = $z:literal, $symbol:literal, $mass:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Element {
            $($variant = $z,)+
        }

        const ELEMENTS: &[(Element, &str, f64)] = &[
            $((Element::$variant, $symbol, $mass),)+
        ];
    };
}

periodic_table! {
    H = 1, "H", 1.008;
    He = 2, "He", 4.0026;
    Li = 3, "Li", 6.94;
    Be = 4, "Be", 9.0122;
    B = 5, "B", 10.81;
    C = 6, "C", 12.011;
    N = 7, "N", 14.007;
    O = 8, "O", 15.999;
    F = 9, "F", 18.998;
    Ne = 10, "Ne", 20.18;
    Na = 11, "Na", 22.99;
    Mg = 12, "Mg", 24.305;
    Al = 13, "Al", 26.982;
    Si = 14, "Si", 28.085;
    P = 15, "P", 30.974;
    S = 16, "S", 32.06;
    Cl = 17, "Cl", 35.45;
    Ar = 18, "Ar", 39.948;
    K = 19, "K", 39.098;
    Ca = 20, "Ca", 40.078;
    Sc = 21, "Sc", 44.956;
    Ti = 22, "Ti", 47.867;
    V = 23, "V", 50.942;
    Cr = 24, "Cr", 51.996;
    Mn = 25, "Mn", 54.938;
    Fe = 26, "Fe", 55.845;
    Co = 27, "Co", 58.933;
    Ni = 28, "Ni", 58.693;
    Cu = 29, "Cu", 63.546;
    Zn = 30, "Zn", 65.38;
    Ga = 31, "Ga", 69.723;
    Ge = 32, "Ge", 72.63;
    As = 33, "As", 74.922;
    Se = 34, "Se", 78.971;
    Br = 35, "Br", 79.904;
    Kr = 36, "Kr", 83.798;
    Rb = 37, "Rb", 85.468;
    Sr = 38, "Sr", 87.62;
    Y = 39, "Y", 88.906;
    Zr = 40, "Zr", 91.224;
    Nb = 41, "Nb", 92.906;
    Mo = 42, "Mo", 95.96;
    Tc = 43, "Tc", 98.0;
    Ru = 44, "Ru", 101.07;
    Rh = 45, "Rh", 102.91;
    Pd = 46, "Pd", 106.42;
    Ag = 47, "Ag", 107.87;
    Cd = 48, "Cd", 112.41;
    In = 49, "In", 114.82;
    Sn = 50, "Sn", 118.71;
    Sb = 51, "Sb", 121.76;
    Te = 52, "Te", 127.6;
    I = 53, "I", 126.9;
    Xe = 54, "Xe", 131.29;
    Cs = 55, "Cs", 132.91;
    Ba = 56, "Ba", 137.33;
    La = 57, "La", 138.91;
    Ce = 58, "Ce", 140.12;
    Pr = 59, "Pr", 140.91;
    Nd = 60, "Nd", 144.24;
    Pm = 61, "Pm", 145.0;
    Sm = 62, "Sm", 150.36;
    Eu = 63, "Eu", 151.96;
    Gd = 64, "Gd", 157.25;
    Tb = 65, "Tb", 158.93;
    Dy = 66, "Dy", 162.5;
    Ho = 67, "Ho", 164.93;
    Er = 68, "Er", 167.26;
    Tm = 69, "Tm", 168.93;
    Yb = 70, "Yb", 173.05;
    Lu = 71, "Lu", 174.97;
    Hf = 72, "Hf", 178.49;
    Ta = 73, "Ta", 180.95;
    W = 74, "W", 183.84;
    Re = 75, "Re", 186.21;
    Os = 76, "Os", 190.23;
    Ir = 77, "Ir", 192.22;
    Pt = 78, "Pt", 195.08;
    Au = 79, "Au", 196.97;
    Hg = 80, "Hg", 200.59;
    Tl = 81, "Tl", 204.38;
    Pb = 82, "Pb", 207.2;
    Bi = 83, "Bi", 208.98;
    Po = 84, "Po", 209.0;
    At = 85, "At", 210.0;
    Rn = 86, "Rn", 222.0;
    Fr = 87, "Fr", 223.0;
    Ra = 88, "Ra", 226.0;
    Ac = 89, "Ac", 227.0;
    Th = 90, "Th", 232.04;
    Pa = 91, "Pa", 231.04;
    U = 92, "U", 238.03;
    Np = 93, "Np", 237.0;
    Pu = 94, "Pu", 244.0;
    Am = 95, "Am", 243.0;
    Cm = 96, "Cm", 247.0;
    Bk = 97, "Bk", 247.0;
    Cf = 98, "Cf", 251.0;
    Es = 99, "Es", 252.0;
    Fm = 100, "Fm", 257.0;
    Md = 101, "Md", 258.0;
    No = 102, "No", 259.0;
    Lr = 103, "Lr", 262.0;
    Rf = 104, "Rf", 267.0;
    Db = 105, "Db", 270.0;
    Sg = 106, "Sg", 271.0;
    Bh = 107, "Bh", 270.0;
    Hs = 108, "Hs", 277.0;
    Mt = 109, "Mt", 276.0;
    Ds = 110, "Ds", 281.0;
    Rg = 111, "Rg", 280.0;
    Cn = 112, "Cn", 285.0;
    Nh = 113, "Nh", 284.0;
    Fl = 114, "Fl", 289.0;
    Mc = 115, "Mc", 288.0;
    Lv = 116, "Lv", 293.0;
    Ts = 117, "Ts", 294.0;
    Og = 118, "Og", 294.0;
}

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn from_atomic_number(z: u8) -> Option<Self> {
        ELEMENTS
            .get(usize::from(z).checked_sub(1)?)
            .map(|(element, _, _)| *element)
    }

    pub fn symbol(&self) -> &'static str {
        ELEMENTS[self.index()].1
    }

    pub fn atomic_mass(&self) -> f64 {
        ELEMENTS[self.index()].2
    }

    /// Allowed valences in increasing order, for elements that have a
    /// conventional bonding pattern. Empty for metals and noble gases.
    pub fn default_valences(&self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            Element::Si => &[4],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::As => &[3, 5],
            Element::Se => &[2, 4, 6],
            _ => &[],
        }
    }

    /// Valences of the isoelectronic neutral element, e.g. N+ behaves like C
    /// and O- like F.
    pub fn charged_valences(&self, charge: i8) -> &'static [u8] {
        if self.default_valences().is_empty() {
            return &[];
        }
        let shifted = i16::from(self.atomic_number()) - i16::from(charge);
        u8::try_from(shifted)
            .ok()
            .and_then(Element::from_atomic_number)
            .map(|e| e.default_valences())
            .unwrap_or(&[])
    }

    /// Elements that may appear outside brackets.
    pub fn is_organic_subset(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }

    /// Elements that may carry the aromatic (lowercase) flag.
    pub fn can_be_aromatic(&self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::As
                | Element::Se
        )
    }

    #[inline]
    fn index(&self) -> usize {
        usize::from(self.atomic_number()) - 1
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ELEMENTS
            .iter()
            .find(|(_, symbol, _)| *symbol == s)
            .map(|(element, _, _)| *element)
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Quadruple => 4.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Contribution to an atom's valence before kekulization; aromatic bonds
    /// count as single and the pi bond is accounted for separately.
    pub fn sigma_valence(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    pub fn smiles_symbol(&self) -> char {
        match self {
            BondOrder::Single => '-',
            BondOrder::Double => '=',
            BondOrder::Triple => '#',
            BondOrder::Quadruple => '$',
            BondOrder::Aromatic => ':',
        }
    }

    pub fn from_smiles_symbol(c: char) -> Option<Self> {
        match c {
            '-' => Some(BondOrder::Single),
            '=' => Some(BondOrder::Double),
            '#' => Some(BondOrder::Triple),
            '$' => Some(BondOrder::Quadruple),
            ':' => Some(BondOrder::Aromatic),
            _ => None,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Quadruple => write!(f, "Quadruple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn element_from_str_valid() {
        assert_eq!(Element::from_str("H").unwrap(), Element::H);
        assert_eq!(Element::from_str("Cl").unwrap(), Element::Cl);
        assert_eq!(Element::from_str("Se").unwrap(), Element::Se);
        assert_eq!(Element::from_str("Og").unwrap(), Element::Og);
    }

    #[test]
    fn element_from_str_rejects_lowercase() {
        let err = Element::from_str("cl").unwrap_err();
        assert_eq!(err.to_string(), "invalid or unsupported element symbol: 'cl'");
    }

    #[test]
    fn atomic_number_roundtrips_through_table() {
        assert_eq!(Element::Na.atomic_number(), 11);
        assert_eq!(Element::from_atomic_number(11), Some(Element::Na));
        assert_eq!(Element::from_atomic_number(118), Some(Element::Og));
        assert_eq!(Element::from_atomic_number(0), None);
        assert_eq!(Element::from_atomic_number(119), None);
    }

    #[test]
    fn atomic_mass_values() {
        assert!(approx_eq(Element::H.atomic_mass(), 1.008, 1e-6));
        assert!(approx_eq(Element::C.atomic_mass(), 12.011, 1e-6));
        assert!(approx_eq(Element::Cl.atomic_mass(), 35.45, 1e-6));
        assert!(approx_eq(Element::Na.atomic_mass(), 22.99, 1e-6));
    }

    #[test]
    fn charged_valences_follow_isoelectronic_neighbor() {
        assert_eq!(Element::N.charged_valences(1), &[4]);
        assert_eq!(Element::O.charged_valences(1), &[3, 5]);
        assert_eq!(Element::C.charged_valences(-1), &[3, 5]);
        assert_eq!(Element::O.charged_valences(-1), &[1]);
        assert!(Element::Na.charged_valences(1).is_empty());
    }

    #[test]
    fn organic_subset_membership() {
        assert!(Element::Br.is_organic_subset());
        assert!(!Element::Se.is_organic_subset());
        assert!(Element::Se.can_be_aromatic());
        assert!(!Element::Cl.can_be_aromatic());
    }

    #[test]
    fn bond_order_symbols() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Quadruple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(BondOrder::from_smiles_symbol(order.smiles_symbol()), Some(order));
        }
        assert_eq!(BondOrder::from_smiles_symbol('/'), None);
        assert!(approx_eq(BondOrder::Aromatic.value(), 1.5, 1e-12));
        assert_eq!(BondOrder::Aromatic.sigma_valence(), 1);
        assert_eq!(BondOrder::Triple.to_string(), "Triple");
    }
}
