//! Sparse multivariate polynomials over opaque expression atoms.
//!
//! An atom is the canonical `ExprId` of anything the polynomial layer
//! does not look inside: a variable, a constant like pi, a function
//! call, or a power with a non-integer exponent. A monomial is a sorted
//! atom-exponent list, a polynomial maps monomials to rational
//! coefficients. Exact rational arithmetic throughout; nothing here
//! rounds.

use ceq_ast::ExprId;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Product of atom powers, kept sorted by atom id.
///
/// The empty monomial is the multiplicative unit (the constant term).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Mono(SmallVec<[(ExprId, u32); 4]>);

impl Mono {
    pub fn unit() -> Self {
        Self::default()
    }

    pub fn atom(id: ExprId) -> Self {
        Self::atom_pow(id, 1)
    }

    pub fn atom_pow(id: ExprId, exp: u32) -> Self {
        if exp == 0 {
            return Self::unit();
        }
        let mut v = SmallVec::new();
        v.push((id, exp));
        Self(v)
    }

    pub fn is_unit(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, u32)> + '_ {
        self.0.iter().copied()
    }

    pub fn exponent_of(&self, atom: ExprId) -> u32 {
        self.0
            .iter()
            .find(|(a, _)| *a == atom)
            .map_or(0, |(_, e)| *e)
    }

    /// Merge-multiply two monomials, summing exponents.
    pub fn mul(&self, other: &Mono) -> Mono {
        let mut out = SmallVec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let (a, ea) = self.0[i];
            let (b, eb) = other.0[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => {
                    out.push((a, ea));
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push((b, eb));
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push((a, ea + eb));
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&self.0[i..]);
        out.extend_from_slice(&other.0[j..]);
        Mono(out)
    }

    /// Componentwise quotient, `None` when not divisible.
    pub fn try_div(&self, other: &Mono) -> Option<Mono> {
        let mut out = SmallVec::new();
        for (atom, exp) in other.iter() {
            if self.exponent_of(atom) < exp {
                return None;
            }
        }
        for (atom, exp) in self.iter() {
            let rem = exp - other.exponent_of(atom);
            if rem > 0 {
                out.push((atom, rem));
            }
        }
        Some(Mono(out))
    }

    /// Componentwise minimum.
    pub fn gcd(&self, other: &Mono) -> Mono {
        let mut out = SmallVec::new();
        for (atom, exp) in self.iter() {
            let e = exp.min(other.exponent_of(atom));
            if e > 0 {
                out.push((atom, e));
            }
        }
        Mono(out)
    }

    /// Split off one atom: its exponent and the remaining monomial.
    pub fn remove_atom(&self, atom: ExprId) -> (u32, Mono) {
        let mut exp = 0;
        let mut rest = SmallVec::new();
        for (a, e) in self.iter() {
            if a == atom {
                exp = e;
            } else {
                rest.push((a, e));
            }
        }
        (exp, Mono(rest))
    }
}

/// Sparse polynomial: monomial -> nonzero rational coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Mono, BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        let mut p = Self::zero();
        p.add_term(Mono::unit(), c);
        p
    }

    pub fn from_atom(id: ExprId) -> Self {
        Self::atom_pow(id, 1)
    }

    pub fn atom_pow(id: ExprId, exp: u32) -> Self {
        let mut p = Self::zero();
        p.add_term(Mono::atom_pow(id, exp), BigRational::one());
        p
    }

    /// Add `coeff * mono`, dropping the term if it cancels to zero.
    pub fn add_term(&mut self, mono: Mono, coeff: BigRational) {
        if coeff.is_zero() {
            return;
        }
        use std::collections::btree_map::Entry;
        match self.terms.entry(mono) {
            Entry::Vacant(e) => {
                e.insert(coeff);
            }
            Entry::Occupied(mut e) => {
                let sum = e.get() + &coeff;
                if sum.is_zero() {
                    e.remove();
                } else {
                    *e.get_mut() = sum;
                }
            }
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Mono, &BigRational)> {
        self.terms.iter()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value when this is a constant (possibly zero) polynomial.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => {
                let (mono, coeff) = self.terms.iter().next()?;
                mono.is_unit().then(|| coeff.clone())
            }
            _ => None,
        }
    }

    /// The single term when the polynomial is a monomial times a coefficient.
    pub fn single_term(&self) -> Option<(&Mono, &BigRational)> {
        if self.terms.len() == 1 {
            self.terms.iter().next()
        } else {
            None
        }
    }

    /// Every atom mentioned by any term, in id order.
    pub fn atoms(&self) -> BTreeSet<ExprId> {
        let mut out = BTreeSet::new();
        for mono in self.terms.keys() {
            for (atom, _) in mono.iter() {
                out.insert(atom);
            }
        }
        out
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        for (mono, coeff) in other.terms() {
            out.add_term(mono.clone(), coeff.clone());
        }
        out
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        let mut out = self.clone();
        for (mono, coeff) in other.terms() {
            out.add_term(mono.clone(), -coeff);
        }
        out
    }

    pub fn neg(&self) -> Poly {
        let mut out = Poly::zero();
        for (mono, coeff) in self.terms() {
            out.add_term(mono.clone(), -coeff);
        }
        out
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (ma, ca) in self.terms() {
            for (mb, cb) in other.terms() {
                out.add_term(ma.mul(mb), ca * cb);
            }
        }
        out
    }

    pub fn pow(&self, exp: u32) -> Poly {
        let mut out = Poly::one();
        for _ in 0..exp {
            out = out.mul(self);
        }
        out
    }

    pub fn scale(&self, c: &BigRational) -> Poly {
        let mut out = Poly::zero();
        for (mono, coeff) in self.terms() {
            out.add_term(mono.clone(), coeff * c);
        }
        out
    }

    /// Highest power of `atom` across all terms.
    pub fn degree_in(&self, atom: ExprId) -> u32 {
        self.terms
            .keys()
            .map(|m| m.exponent_of(atom))
            .max()
            .unwrap_or(0)
    }

    /// Coefficients of `atom^0 .. atom^degree` as polynomials in the
    /// remaining atoms.
    pub fn coeffs_in(&self, atom: ExprId) -> Vec<Poly> {
        let deg = self.degree_in(atom) as usize;
        let mut out = vec![Poly::zero(); deg + 1];
        for (mono, coeff) in self.terms() {
            let (exp, rest) = mono.remove_atom(atom);
            out[exp as usize].add_term(rest, coeff.clone());
        }
        out
    }

    /// Rational content: divide by this and the coefficients become
    /// coprime integers with a positive leading coefficient. Returns 1
    /// for the zero polynomial.
    pub fn content(&self) -> BigRational {
        use num_integer::Integer;
        let mut numer_gcd = BigInt::zero();
        let mut denom_lcm = BigInt::one();
        for c in self.terms.values() {
            numer_gcd = numer_gcd.gcd(c.numer());
            denom_lcm = denom_lcm.lcm(c.denom());
        }
        if numer_gcd.is_zero() {
            return BigRational::one();
        }
        let mut content = BigRational::new(numer_gcd, denom_lcm);
        if let Some((_, lead)) = self.terms.iter().next_back() {
            if lead.is_negative() {
                content = -content;
            }
        }
        content
    }

    /// Monomial dividing every term. Unit for the zero polynomial.
    pub fn mono_gcd(&self) -> Mono {
        let mut it = self.terms.keys();
        let first = match it.next() {
            Some(m) => m.clone(),
            None => return Mono::unit(),
        };
        it.fold(first, |acc, m| acc.gcd(m))
    }

    /// Divide every term by `mono`. Caller guarantees divisibility.
    pub fn div_mono(&self, mono: &Mono) -> Poly {
        let mut out = Poly::zero();
        for (m, coeff) in self.terms() {
            match m.try_div(mono) {
                Some(q) => out.add_term(q, coeff.clone()),
                None => unreachable!("mono_gcd divides every term"),
            }
        }
        out
    }
}
