use std::collections::BTreeMap;

use super::error::Error;
use super::stereo::{self, BondDirection};
use super::valence;
use crate::model::atom::{Atom, Chirality, StereoRef, TetrahedralStereo};
use crate::model::molecule::{Bond, DoubleBondStereo, Molecule};
use crate::model::types::{BondOrder, Element};

/// Parses a SMILES string into a molecule graph.
///
/// Aromatic atoms and bonds are kept as written; implicit hydrogens of
/// unbracketed atoms are resolved; `@`/`@@` and `/`/`\` are turned into
/// [`TetrahedralStereo`] and [`DoubleBondStereo`] annotations.
pub fn parse(smiles: &str) -> Result<Molecule, Error> {
    let trimmed = smiles.trim();
    if trimmed.is_empty() {
        return Err(Error::Empty);
    }
    let offset = smiles.len() - smiles.trim_start().len();
    Parser::new(trimmed, offset).run()
}

#[derive(Debug, Clone, Copy)]
struct BondToken {
    order: BondOrder,
    direction: Option<BondDirection>,
}

#[derive(Debug)]
struct ParsedAtom {
    atom: Atom,
    bracketed: bool,
    chirality: Option<Chirality>,
    refs: Vec<StereoRef>,
    has_predecessor: bool,
}

#[derive(Debug)]
struct ParsedBond {
    i: usize,
    j: usize,
    order: BondOrder,
    /// Direction marker together with the atom written before the marker.
    direction: Option<(BondDirection, usize)>,
}

#[derive(Debug)]
struct RingOpening {
    atom: usize,
    token: Option<BondToken>,
    /// Index of the placeholder in the opening atom's stereo references.
    slot: usize,
}

struct Parser<'a> {
    input: &'a [u8],
    offset: usize,
    pos: usize,
    atoms: Vec<ParsedAtom>,
    bonds: Vec<ParsedBond>,
    previous: Option<usize>,
    pending: Option<BondToken>,
    branches: Vec<usize>,
    rings: BTreeMap<u16, RingOpening>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, offset: usize) -> Self {
        Self {
            input: input.as_bytes(),
            offset,
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            previous: None,
            pending: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn error(&self, details: impl Into<String>) -> Error {
        Error::parse(self.offset + self.pos, details)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    fn run(mut self) -> Result<Molecule, Error> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'.' => self.dot()?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.bond_symbol(c)?,
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => self.bracket_atom()?,
                b'*' => return Err(Error::unsupported(self.offset + self.pos, "*")),
                _ => self.organic_atom()?,
            }
        }

        if self.pending.is_some() {
            return Err(self.error("bond symbol at end of input"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("unclosed branch"));
        }
        if let Some(number) = self.rings.keys().next() {
            return Err(self.error(format!("unclosed ring bond {number}")));
        }
        self.finish()
    }

    fn open_branch(&mut self) -> Result<(), Error> {
        let Some(previous) = self.previous else {
            return Err(self.error("branch before any atom"));
        };
        if self.pending.is_some() {
            return Err(self.error("bond symbol before branch"));
        }
        if self.peek_at(1) == Some(b')') {
            return Err(self.error("empty branch"));
        }
        self.branches.push(previous);
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(self.error("bond symbol before end of branch"));
        }
        let Some(atom) = self.branches.pop() else {
            return Err(self.error("unbalanced ')'"));
        };
        self.previous = Some(atom);
        self.pos += 1;
        Ok(())
    }

    fn dot(&mut self) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(self.error("bond symbol before '.'"));
        }
        if self.previous.is_none() {
            return Err(self.error("'.' before any atom"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("'.' inside a branch"));
        }
        self.previous = None;
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self, c: u8) -> Result<(), Error> {
        if self.previous.is_none() {
            return Err(self.error("bond symbol before any atom"));
        }
        if self.pending.is_some() {
            return Err(self.error("consecutive bond symbols"));
        }
        let symbol = char::from(c);
        let token = match BondDirection::from_char(symbol) {
            Some(direction) => BondToken {
                order: BondOrder::Single,
                direction: Some(direction),
            },
            None => BondToken {
                order: BondOrder::from_smiles_symbol(symbol)
                    .ok_or_else(|| self.error("unknown bond symbol"))?,
                direction: None,
            },
        };
        self.pending = Some(token);
        self.pos += 1;
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<(), Error> {
        let Some(atom) = self.previous else {
            return Err(self.error("ring bond before any atom"));
        };
        let number = self.ring_number()?;
        let token = self.pending.take();

        match self.rings.remove(&number) {
            Some(opening) => {
                if opening.atom == atom {
                    return Err(self.error(format!("ring bond {number} closes on its own atom")));
                }
                if self.bond_exists(opening.atom, atom) {
                    return Err(self.error(format!("ring bond {number} duplicates an existing bond")));
                }
                let (token, written_first) = match (opening.token, token) {
                    (Some(open), Some(close)) if open.order != close.order => {
                        return Err(self.error(format!("conflicting bond orders on ring bond {number}")));
                    }
                    (Some(open), _) => (Some(open), opening.atom),
                    (None, close) => (close, atom),
                };
                self.add_bond(opening.atom, atom, token, written_first)?;
                self.atoms[opening.atom].refs[opening.slot] = StereoRef::Atom(atom);
                self.atoms[atom].refs.push(StereoRef::Atom(opening.atom));
            }
            None => {
                let slot = self.atoms[atom].refs.len();
                // Placeholder until the matching digit is seen.
                self.atoms[atom].refs.push(StereoRef::Implicit);
                self.rings.insert(number, RingOpening { atom, token, slot });
            }
        }
        Ok(())
    }

    fn ring_number(&mut self) -> Result<u16, Error> {
        if self.peek() == Some(b'%') {
            let digits = (self.peek_at(1), self.peek_at(2));
            let (Some(tens @ b'0'..=b'9'), Some(ones @ b'0'..=b'9')) = digits else {
                return Err(self.error("'%' must be followed by two digits"));
            };
            self.pos += 3;
            Ok(u16::from(tens - b'0') * 10 + u16::from(ones - b'0'))
        } else {
            let digit = self.peek().map(|d| d - b'0').unwrap_or(0);
            self.pos += 1;
            Ok(u16::from(digit))
        }
    }

    fn bond_exists(&self, a: usize, b: usize) -> bool {
        self.bonds
            .iter()
            .any(|bond| (bond.i == a && bond.j == b) || (bond.i == b && bond.j == a))
    }

    fn organic_atom(&mut self) -> Result<(), Error> {
        let c = self.input[self.pos];
        let next = self.peek_at(1);
        let (element, aromatic, width) = match c {
            b'B' if next == Some(b'r') => (Element::Br, false, 2),
            b'C' if next == Some(b'l') => (Element::Cl, false, 2),
            b'B' => (Element::B, false, 1),
            b'C' => (Element::C, false, 1),
            b'N' => (Element::N, false, 1),
            b'O' => (Element::O, false, 1),
            b'P' => (Element::P, false, 1),
            b'S' => (Element::S, false, 1),
            b'F' => (Element::F, false, 1),
            b'I' => (Element::I, false, 1),
            b'b' => (Element::B, true, 1),
            b'c' => (Element::C, true, 1),
            b'n' => (Element::N, true, 1),
            b'o' => (Element::O, true, 1),
            b'p' => (Element::P, true, 1),
            b's' => (Element::S, true, 1),
            _ => {
                let shown = self.input[self.pos..]
                    .utf8_chunks()
                    .next()
                    .and_then(|chunk| chunk.valid().chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(self.error(format!("unexpected character '{shown}'")));
            }
        };
        self.pos += width;

        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        self.push_atom(atom, false, None)
    }

    fn bracket_atom(&mut self) -> Result<(), Error> {
        let start = self.pos;
        self.pos += 1;

        let isotope = self.number()?;
        if isotope == Some(0) {
            return Err(self.error("isotope mass number must be positive"));
        }
        let (element, aromatic) = self.bracket_symbol()?;
        let chirality = self.chirality()?;

        let hydrogens = if self.peek() == Some(b'H') {
            self.pos += 1;
            self.single_digit().unwrap_or(1)
        } else {
            0
        };

        let charge = self.charge()?;

        let class = if self.peek() == Some(b':') {
            self.pos += 1;
            Some(
                self.number()?
                    .ok_or_else(|| self.error("atom class must be a number"))?,
            )
        } else {
            None
        };

        if self.peek() != Some(b']') {
            return Err(self.error(format!("expected ']' to close atom opened at {}", self.offset + start)));
        }
        self.pos += 1;

        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        atom.isotope = isotope
            .map(u16::try_from)
            .transpose()
            .map_err(|_| self.error("isotope mass number is too large"))?;
        atom.hydrogens = hydrogens;
        atom.charge = charge;
        atom.class = class;
        self.push_atom(atom, true, chirality)
    }

    fn number(&mut self) -> Result<Option<u32>, Error> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let digits = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("invalid number"))?;
        digits
            .parse()
            .map(Some)
            .map_err(|_| self.error("number is too large"))
    }

    fn single_digit(&mut self) -> Option<u8> {
        match self.peek() {
            Some(d @ b'0'..=b'9') => {
                self.pos += 1;
                Some(d - b'0')
            }
            _ => None,
        }
    }

    fn bracket_symbol(&mut self) -> Result<(Element, bool), Error> {
        let Some(first) = self.peek() else {
            return Err(self.error("unterminated bracket atom"));
        };
        if first == b'*' {
            return Err(Error::unsupported(self.offset + self.pos, "*"));
        }

        if first.is_ascii_lowercase() {
            for symbol in ["se", "as"] {
                if self.input[self.pos..].starts_with(symbol.as_bytes()) {
                    self.pos += 2;
                    let element = if symbol == "se" { Element::Se } else { Element::As };
                    return Ok((element, true));
                }
            }
            let element = match first {
                b'b' => Element::B,
                b'c' => Element::C,
                b'n' => Element::N,
                b'o' => Element::O,
                b'p' => Element::P,
                b's' => Element::S,
                _ => return Err(self.error("unknown aromatic element")),
            };
            self.pos += 1;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(self.error("expected element symbol"));
        }
        if let Some(second) = self.peek_at(1).filter(u8::is_ascii_lowercase) {
            let pair = [first, second];
            let parsed = std::str::from_utf8(&pair)
                .ok()
                .and_then(|s| s.parse::<Element>().ok());
            if let Some(element) = parsed {
                self.pos += 2;
                return Ok((element, false));
            }
        }
        let single = [first];
        let element = std::str::from_utf8(&single)
            .ok()
            .and_then(|s| s.parse::<Element>().ok())
            .ok_or_else(|| self.error("unknown element symbol"))?;
        self.pos += 1;
        Ok((element, false))
    }

    fn chirality(&mut self) -> Result<Option<Chirality>, Error> {
        if self.peek() != Some(b'@') {
            return Ok(None);
        }
        self.pos += 1;
        match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some(b'@'), _, _) => {
                self.pos += 1;
                Ok(Some(Chirality::Clockwise))
            }
            (Some(b'T'), Some(b'H'), Some(b'1')) => {
                self.pos += 3;
                Ok(Some(Chirality::Anticlockwise))
            }
            (Some(b'T'), Some(b'H'), Some(b'2')) => {
                self.pos += 3;
                Ok(Some(Chirality::Clockwise))
            }
            (Some(a @ (b'A' | b'S' | b'T' | b'O')), Some(b), _)
                if matches!(
                    (a, b),
                    (b'A', b'L') | (b'S', b'P') | (b'T', b'B') | (b'O', b'H') | (b'T', b'H')
                ) =>
            {
                let class = format!("@{}{}", char::from(a), char::from(b));
                Err(Error::unsupported(self.offset + self.pos - 1, class))
            }
            _ => Ok(Some(Chirality::Anticlockwise)),
        }
    }

    fn charge(&mut self) -> Result<i8, Error> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.input[self.pos];
        self.pos += 1;

        if self.peek() == Some(symbol) {
            self.pos += 1;
            return Ok(sign * 2);
        }
        let magnitude = match self.single_digit() {
            Some(tens) => match self.single_digit() {
                Some(ones) => tens * 10 + ones,
                None => tens,
            },
            None => 1,
        };
        if magnitude > 15 {
            return Err(self.error("formal charge out of range"));
        }
        let magnitude = i8::try_from(magnitude).map_err(|_| self.error("formal charge out of range"))?;
        Ok(sign * magnitude)
    }

    fn push_atom(
        &mut self,
        atom: Atom,
        bracketed: bool,
        chirality: Option<Chirality>,
    ) -> Result<(), Error> {
        let idx = self.atoms.len();
        let mut refs = Vec::with_capacity(4);
        if let Some(previous) = self.previous {
            refs.push(StereoRef::Atom(previous));
        }
        if bracketed && atom.hydrogens > 0 {
            refs.push(StereoRef::Implicit);
        }
        self.atoms.push(ParsedAtom {
            atom,
            bracketed,
            chirality,
            refs,
            has_predecessor: self.previous.is_some(),
        });

        if let Some(previous) = self.previous {
            let token = self.pending.take();
            self.add_bond(previous, idx, token, previous)?;
            self.atoms[previous].refs.push(StereoRef::Atom(idx));
        }
        self.previous = Some(idx);
        Ok(())
    }

    fn add_bond(
        &mut self,
        a: usize,
        b: usize,
        token: Option<BondToken>,
        written_first: usize,
    ) -> Result<(), Error> {
        let both_aromatic = self.atoms[a].atom.aromatic && self.atoms[b].atom.aromatic;
        let order = match token {
            Some(token) => token.order,
            None if both_aromatic => BondOrder::Aromatic,
            None => BondOrder::Single,
        };
        if order == BondOrder::Aromatic && !both_aromatic {
            return Err(self.error("aromatic bond between non-aromatic atoms"));
        }
        self.bonds.push(ParsedBond {
            i: a,
            j: b,
            order,
            direction: token.and_then(|t| t.direction).map(|d| (d, written_first)),
        });
        Ok(())
    }

    fn finish(self) -> Result<Molecule, Error> {
        let mut mol = Molecule::new();
        mol.bonds = self
            .bonds
            .iter()
            .map(|b| Bond::new(b.i, b.j, b.order))
            .collect();

        let mut parsed_atoms = self.atoms;
        mol.atoms = parsed_atoms.iter().map(|p| p.atom.clone()).collect();
        let adj = mol.adjacency();

        for (idx, parsed) in parsed_atoms.iter_mut().enumerate() {
            let sum = valence::bond_sum(&mol, &adj, idx);
            let atom = &mut mol.atoms[idx];
            if !parsed.bracketed {
                atom.hydrogens = valence::implicit_hydrogens(atom.element, atom.aromatic, sum);
            }
            atom.stereo = tetrahedral_stereo(parsed, atom.hydrogens);
        }

        assign_double_bond_stereo(&mut mol, &self.bonds);
        Ok(mol)
    }
}

fn tetrahedral_stereo(parsed: &mut ParsedAtom, hydrogens: u8) -> Option<TetrahedralStereo> {
    let chirality = parsed.chirality?;
    if hydrogens > 1 {
        return None;
    }
    let mut refs = std::mem::take(&mut parsed.refs);
    if refs.len() == 3 && !refs.contains(&StereoRef::Implicit) {
        // Lone pair of a three-coordinate center.
        let slot = usize::from(parsed.has_predecessor);
        refs.insert(slot, StereoRef::Implicit);
    }
    (refs.len() == 4).then_some(TetrahedralStereo { chirality, refs })
}

fn assign_double_bond_stereo(mol: &mut Molecule, parsed: &[ParsedBond]) {
    let adj = mol.adjacency();

    // Side of each substituent as seen from its double-bond atom.
    let side_from = |center: usize| {
        adj[center].iter().find_map(|&(neighbor, bond)| {
            let (direction, first) = parsed[bond].direction?;
            Some((neighbor, stereo::side_of(direction, first == center)))
        })
    };

    for idx in 0..mol.bonds.len() {
        if mol.bonds[idx].order != BondOrder::Double {
            continue;
        }
        let (i, j) = (mol.bonds[idx].i, mol.bonds[idx].j);
        let (Some((ref_i, side_i)), Some((ref_j, side_j))) = (side_from(i), side_from(j)) else {
            continue;
        };
        if ref_i == j || ref_j == i {
            continue;
        }
        mol.bonds[idx].stereo = Some(DoubleBondStereo {
            ref_i,
            ref_j,
            configuration: stereo::configuration_of(side_i, side_j),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::molecule::Configuration;

    #[test]
    fn parses_chain_with_implicit_hydrogens() {
        let mol = parse("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        let hydrogens: Vec<u8> = mol.atoms.iter().map(|a| a.hydrogens).collect();
        assert_eq!(hydrogens, vec![3, 2, 1]);
    }

    #[test]
    fn parses_branches_and_ring_closures() {
        let mol = parse("CC(C)(C)C1CC1").unwrap();
        assert_eq!(mol.atom_count(), 7);
        assert_eq!(mol.bond_count(), 7);
        assert!(mol.bond_between(4, 6).is_some());
        assert_eq!(mol.atoms[1].hydrogens, 0);
    }

    #[test]
    fn two_digit_ring_numbers() {
        let mol = parse("C%10CCCC%10").unwrap();
        assert_eq!(mol.bond_count(), 5);
        assert!(mol.bond_between(0, 4).is_some());
    }

    #[test]
    fn aromatic_atoms_get_aromatic_bonds_and_hydrogens() {
        let mol = parse("c1ccccc1").unwrap();
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(mol.atoms.iter().all(|a| a.aromatic && a.hydrogens == 1));
    }

    #[test]
    fn bracket_atom_fields() {
        let mol = parse("[13CH3:7][NH3+].[O-2]").unwrap();
        let c = &mol.atoms[0];
        assert_eq!(c.element, Element::C);
        assert_eq!(c.isotope, Some(13));
        assert_eq!(c.hydrogens, 3);
        assert_eq!(c.class, Some(7));
        assert_eq!(mol.atoms[1].charge, 1);
        assert_eq!(mol.atoms[1].hydrogens, 3);
        assert_eq!(mol.atoms[2].charge, -2);
    }

    #[test]
    fn two_letter_bracket_symbols_are_greedy() {
        let mol = parse("[Na+].[Cl-].[se]1cccc1").unwrap();
        assert_eq!(mol.atoms[0].element, Element::Na);
        assert_eq!(mol.atoms[1].element, Element::Cl);
        assert_eq!(mol.atoms[2].element, Element::Se);
        assert!(mol.atoms[2].aromatic);
    }

    #[test]
    fn chirality_references_follow_written_order() {
        let mol = parse("N[C@@H](C)O").unwrap();
        let stereo = mol.atoms[1].stereo.as_ref().unwrap();
        assert_eq!(stereo.chirality, Chirality::Clockwise);
        assert_eq!(
            stereo.refs,
            vec![
                StereoRef::Atom(0),
                StereoRef::Implicit,
                StereoRef::Atom(2),
                StereoRef::Atom(3)
            ]
        );
    }

    #[test]
    fn ring_closure_takes_its_place_in_chirality_references() {
        let mol = parse("[C@H]1(F)CC1").unwrap();
        let stereo = mol.atoms[0].stereo.as_ref().unwrap();
        assert_eq!(
            stereo.refs,
            vec![
                StereoRef::Implicit,
                StereoRef::Atom(3),
                StereoRef::Atom(1),
                StereoRef::Atom(2)
            ]
        );
    }

    #[test]
    fn double_bond_geometry() {
        let trans = parse("F/C=C/F").unwrap();
        let cis = parse(r"F/C=C\F").unwrap();
        assert_eq!(
            trans.bonds[1].stereo.map(|s| s.configuration),
            Some(Configuration::Trans)
        );
        assert_eq!(
            cis.bonds[1].stereo.map(|s| s.configuration),
            Some(Configuration::Cis)
        );
    }

    #[test]
    fn leading_direction_marker_is_equivalent() {
        let a = parse(r"C(\F)=C/F").unwrap();
        assert_eq!(
            a.bonds[1].stereo.map(|s| s.configuration),
            Some(Configuration::Trans)
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse("   "), Err(Error::Empty));
        assert!(matches!(parse("not_a_molecule"), Err(Error::Parse { .. })));
        assert!(matches!(parse("C(C"), Err(Error::Parse { .. })));
        assert!(matches!(parse("CC)"), Err(Error::Parse { .. })));
        assert!(matches!(parse("C1CC"), Err(Error::Parse { .. })));
        assert!(matches!(parse("C=="), Err(Error::Parse { .. })));
        assert!(matches!(parse("[C"), Err(Error::Parse { .. })));
        assert!(matches!(parse("[Xx]"), Err(Error::Parse { .. })));
        assert!(matches!(parse("C11"), Err(Error::Parse { .. })));
    }

    #[test]
    fn rejects_unsupported_features() {
        assert!(matches!(parse("C*"), Err(Error::Unsupported { .. })));
        assert!(matches!(parse("[*]C"), Err(Error::Unsupported { .. })));
        assert!(matches!(
            parse("F[C@SP1](Cl)(Br)I"),
            Err(Error::Unsupported { .. })
        ));
    }

    #[test]
    fn error_positions_account_for_leading_whitespace() {
        assert_eq!(
            parse("  C(C"),
            Err(Error::parse(5, "unclosed branch"))
        );
    }
}
