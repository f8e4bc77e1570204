//! Elliptic curve group laws over a [`MontgomeryField`].
//!
//! A [`Curve`] is built once from its parameters and then shared read-only.
//! The two supported families expose the same operations through
//! [`CurveFamily`], each with its own formulas.

pub mod batch;
pub mod config;
mod edwards;
pub mod glv;
pub mod point;
pub mod random;
mod weierstrass;

use crate::{
    error::CurveError,
    field::{arena::Arena, FieldElement, MontgomeryField},
};
use config::{CurveConfig, Equation};
use glv::{Endomorphism, GlvBasis};
use log::debug;
use num_bigint::BigUint;
use point::{AffinePoint, ProjectivePoint};

/// The curve equation, with coefficients in Montgomery form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurveFamily<const N: usize> {
    /// `y^2 = x^3 + b`, with `b3 = 3b` cached for the complete formulas.
    ShortWeierstrass {
        b: FieldElement<N>,
        b3: FieldElement<N>,
    },
    /// `-x^2 + y^2 = 1 + d x^2 y^2`, with `k = 2d` cached.
    TwistedEdwards {
        d: FieldElement<N>,
        k: FieldElement<N>,
    },
}

/// Whether batched additions may assume their operands are distinct,
/// non-opposite and not the identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdditionMode {
    #[default]
    Safe,
    Unsafe,
}

/// One addition `points[out] = points[lhs] + points[rhs]` of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairIndices {
    pub out: usize,
    pub lhs: usize,
    pub rhs: usize,
}

#[derive(Clone, Debug)]
pub struct Curve<const N: usize> {
    name: String,
    base: MontgomeryField<N>,
    scalar: MontgomeryField<N>,
    family: CurveFamily<N>,
    generator: AffinePoint<N>,
    cofactor: BigUint,
    endomorphism: Option<Endomorphism<N>>,
}

impl<const N: usize> Curve<N> {
    /// Instantiates a curve, checking every parameter: the generator is on
    /// the curve and of the given order, and the endomorphism constants (if
    /// any) agree with each other on the generator.
    pub fn new(config: &CurveConfig) -> Result<Self, CurveError> {
        let base = MontgomeryField::new(&config.modulus)?;
        let scalar = MontgomeryField::new(&config.order)?;
        if config.cofactor == BigUint::ZERO {
            return Err(CurveError::ZeroCofactor);
        }

        let family = match &config.equation {
            Equation::ShortWeierstrass { b } => {
                let b = base.from_biguint(b)?;
                if base.is_zero(&b) {
                    return Err(CurveError::DegenerateCoefficient("b"));
                }
                let b3 = base.add(&base.double(&b), &b);
                CurveFamily::ShortWeierstrass { b, b3 }
            }
            Equation::TwistedEdwards { d } => {
                let d = base.from_biguint(d)?;
                // the addition law is complete only for a non-square d
                if base.is_square(&d) || d == base.neg(&base.one()) {
                    return Err(CurveError::DegenerateCoefficient("d"));
                }
                let k = base.double(&d);
                CurveFamily::TwistedEdwards { d, k }
            }
        };

        let mut curve = Self {
            name: config.name.clone(),
            base,
            scalar,
            family,
            generator: AffinePoint::default(),
            cofactor: config.cofactor.clone(),
            endomorphism: None,
        };
        curve.generator = curve
            .point_from_coordinates(&config.generator.x, &config.generator.y)
            .map_err(|e| match e {
                CurveError::NotOnCurve(_) => CurveError::NotOnCurve("generator"),
                e => e,
            })?;
        if curve.generator.infinity
            || !curve.is_identity(&curve.scalar_mul(&curve.generator, &config.order))
        {
            return Err(CurveError::GeneratorOrder);
        }

        if let Some(endo) = &config.endomorphism {
            curve.endomorphism = Some(curve.check_endomorphism(&endo.beta, &endo.lambda)?);
        }

        debug!(
            "instantiated curve {} ({}-bit base field, {}-bit order, glv: {})",
            curve.name,
            curve.base.bits(),
            curve.scalar.bits(),
            curve.endomorphism.is_some()
        );
        Ok(curve)
    }

    fn check_endomorphism(
        &self,
        beta: &BigUint,
        lambda: &BigUint,
    ) -> Result<Endomorphism<N>, CurveError> {
        if !matches!(self.family, CurveFamily::ShortWeierstrass { .. }) {
            return Err(CurveError::InconsistentEndomorphism(
                "only short Weierstrass curves support (x, y) -> (beta x, y)",
            ));
        }
        let f = &self.base;
        let beta = f.from_biguint(beta)?;
        if f.is_one(&beta) || !f.is_one(&f.pow(&beta, &[3])) {
            return Err(CurveError::InconsistentEndomorphism(
                "beta is not a primitive cube root of unity",
            ));
        }
        let order = self.order();
        if lambda >= order
            || lambda == &BigUint::from(1u8)
            || lambda.modpow(&BigUint::from(3u8), order) != BigUint::from(1u8)
        {
            return Err(CurveError::InconsistentEndomorphism(
                "lambda is not a primitive cube root of unity",
            ));
        }

        let basis = GlvBasis::new(order, lambda)?;
        let endo = Endomorphism::new(beta, lambda.clone(), basis);
        let expected = self.scalar_mul(&self.generator, lambda);
        let image = self.to_projective(&endo.apply(f, &self.generator));
        if !self.eq_projective(&expected, &image) {
            return Err(CurveError::InconsistentEndomorphism(
                "lambda G differs from (beta x, y)",
            ));
        }
        Ok(endo)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_field(&self) -> &MontgomeryField<N> {
        &self.base
    }

    pub fn scalar_field(&self) -> &MontgomeryField<N> {
        &self.scalar
    }

    pub fn family(&self) -> &CurveFamily<N> {
        &self.family
    }

    pub fn generator(&self) -> &AffinePoint<N> {
        &self.generator
    }

    /// The prime order `q` of the generator.
    pub fn order(&self) -> &BigUint {
        self.scalar.modulus()
    }

    pub fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }

    pub fn endomorphism(&self) -> Option<&Endomorphism<N>> {
        self.endomorphism.as_ref()
    }

    ////////////////////////////////////////////////////////////////////////
    // single points
    ////////////////////////////////////////////////////////////////////////

    pub fn identity(&self) -> ProjectivePoint<N> {
        match self.family {
            CurveFamily::ShortWeierstrass { .. } => weierstrass::identity(&self.base),
            CurveFamily::TwistedEdwards { .. } => edwards::identity(&self.base),
        }
    }

    pub fn affine_identity(&self) -> AffinePoint<N> {
        let y = match self.family {
            CurveFamily::ShortWeierstrass { .. } => self.base.zero(),
            CurveFamily::TwistedEdwards { .. } => self.base.one(),
        };
        AffinePoint {
            x: self.base.zero(),
            y,
            infinity: true,
        }
    }

    pub fn is_identity(&self, p: &ProjectivePoint<N>) -> bool {
        match self.family {
            CurveFamily::ShortWeierstrass { .. } => self.base.is_zero(&p.z),
            CurveFamily::TwistedEdwards { .. } => self.base.is_zero(&p.x) && p.y == p.z,
        }
    }

    pub fn is_on_curve(&self, p: &AffinePoint<N>) -> bool {
        if p.infinity {
            return true;
        }
        match &self.family {
            CurveFamily::ShortWeierstrass { b, .. } => {
                weierstrass::is_on_curve(&self.base, b, &p.x, &p.y)
            }
            CurveFamily::TwistedEdwards { d, .. } => edwards::is_on_curve(&self.base, d, &p.x, &p.y),
        }
    }

    /// Builds an affine point from canonical coordinates, checking that it
    /// lies on the curve.
    pub fn point_from_coordinates(
        &self,
        x: &BigUint,
        y: &BigUint,
    ) -> Result<AffinePoint<N>, CurveError> {
        let mut p = AffinePoint::new(self.base.from_biguint(x)?, self.base.from_biguint(y)?);
        if !self.is_on_curve(&p) {
            return Err(CurveError::NotOnCurve("point"));
        }
        if let CurveFamily::TwistedEdwards { .. } = self.family {
            p.infinity = self.base.is_zero(&p.x) && self.base.is_one(&p.y);
        }
        Ok(p)
    }

    /// Canonical coordinates of an affine point, `None` for the identity on
    /// Weierstraß curves.
    pub fn coordinates(&self, p: &AffinePoint<N>) -> Option<(BigUint, BigUint)> {
        if p.infinity && matches!(self.family, CurveFamily::ShortWeierstrass { .. }) {
            return None;
        }
        Some((self.base.to_biguint(&p.x), self.base.to_biguint(&p.y)))
    }

    pub fn to_projective(&self, p: &AffinePoint<N>) -> ProjectivePoint<N> {
        if p.infinity {
            return self.identity();
        }
        let t = match self.family {
            CurveFamily::ShortWeierstrass { .. } => self.base.zero(),
            CurveFamily::TwistedEdwards { .. } => self.base.mul(&p.x, &p.y),
        };
        ProjectivePoint {
            x: p.x,
            y: p.y,
            z: self.base.one(),
            t,
        }
    }

    /// Projective to affine with one inversion.
    pub fn to_affine(&self, p: &ProjectivePoint<N>) -> AffinePoint<N> {
        match self.base.inverse(&p.z) {
            None => self.affine_identity(),
            Some(zinv) => self.scale_to_affine(p, &zinv),
        }
    }

    #[inline]
    pub(crate) fn scale_to_affine(
        &self,
        p: &ProjectivePoint<N>,
        zinv: &FieldElement<N>,
    ) -> AffinePoint<N> {
        let x = self.base.mul(&p.x, zinv);
        let y = self.base.mul(&p.y, zinv);
        let infinity = match self.family {
            CurveFamily::ShortWeierstrass { .. } => false,
            CurveFamily::TwistedEdwards { .. } => self.base.is_zero(&x) && self.base.is_one(&y),
        };
        AffinePoint { x, y, infinity }
    }

    pub fn negate(&self, p: &AffinePoint<N>) -> AffinePoint<N> {
        let mut out = *p;
        if !p.infinity {
            match self.family {
                CurveFamily::ShortWeierstrass { .. } => out.y = self.base.neg(&p.y),
                CurveFamily::TwistedEdwards { .. } => out.x = self.base.neg(&p.x),
            }
        }
        out
    }

    pub fn negate_projective(&self, p: &ProjectivePoint<N>) -> ProjectivePoint<N> {
        let mut out = *p;
        match self.family {
            CurveFamily::ShortWeierstrass { .. } => out.y = self.base.neg(&p.y),
            CurveFamily::TwistedEdwards { .. } => {
                out.x = self.base.neg(&p.x);
                out.t = self.base.neg(&p.t);
            }
        }
        out
    }

    /// Equality of the represented points.
    pub fn eq_projective(&self, p: &ProjectivePoint<N>, q: &ProjectivePoint<N>) -> bool {
        let f = &self.base;
        f.mul(&p.x, &q.z) == f.mul(&q.x, &p.z) && f.mul(&p.y, &q.z) == f.mul(&q.y, &p.z)
    }

    pub fn add_projective(
        &self,
        p: &ProjectivePoint<N>,
        q: &ProjectivePoint<N>,
    ) -> ProjectivePoint<N> {
        match &self.family {
            CurveFamily::ShortWeierstrass { b3, .. } => weierstrass::add(&self.base, b3, p, q),
            CurveFamily::TwistedEdwards { k, .. } => edwards::add(&self.base, k, p, q),
        }
    }

    pub fn add_mixed(&self, p: &ProjectivePoint<N>, q: &AffinePoint<N>) -> ProjectivePoint<N> {
        if q.infinity {
            return *p;
        }
        match &self.family {
            CurveFamily::ShortWeierstrass { b3, .. } => {
                weierstrass::add_mixed(&self.base, b3, p, q)
            }
            CurveFamily::TwistedEdwards { k, .. } => edwards::add_mixed(&self.base, k, p, q),
        }
    }

    pub fn double_projective(&self, p: &ProjectivePoint<N>) -> ProjectivePoint<N> {
        match &self.family {
            CurveFamily::ShortWeierstrass { b3, .. } => weierstrass::double(&self.base, b3, p),
            CurveFamily::TwistedEdwards { .. } => edwards::double(&self.base, p),
        }
    }

    /// Affine addition of two points. Handles every case, at the price of
    /// one inversion; batches should go through [`Self::batch_add_safe`].
    pub fn add_affine(&self, p: &AffinePoint<N>, q: &AffinePoint<N>) -> AffinePoint<N> {
        let mut out = [AffinePoint::default()];
        self.batch_add_safe(&mut Arena::with_capacity(4), &mut out, &[*p], &[*q]);
        out[0]
    }

    pub fn double_affine(&self, p: &AffinePoint<N>) -> AffinePoint<N> {
        self.add_affine(p, p)
    }

    /// Affine `p + q` on a Weierstraß curve for `p != ±q`, neither the
    /// identity, given `inv = 1 / (x_q - x_p)`. On Edwards curves the
    /// affine law needs two inverses, see [`Self::batch_add_unsafe`].
    pub fn add_affine_with_inverse(
        &self,
        p: &AffinePoint<N>,
        q: &AffinePoint<N>,
        inv: &FieldElement<N>,
    ) -> AffinePoint<N> {
        weierstrass::add_affine_with_inverse(&self.base, p, q, inv)
    }

    /// Affine `2p` on a Weierstraß curve for `y_p != 0`, given `inv = 1 / (2 y_p)`.
    pub fn double_affine_with_inverse(
        &self,
        p: &AffinePoint<N>,
        inv: &FieldElement<N>,
    ) -> AffinePoint<N> {
        weierstrass::double_affine_with_inverse(&self.base, p, inv)
    }

    /// Double-and-add, most significant bit first.
    pub fn scalar_mul(&self, p: &AffinePoint<N>, k: &BigUint) -> ProjectivePoint<N> {
        let mut acc = self.identity();
        for i in (0..k.bits()).rev() {
            acc = self.double_projective(&acc);
            if k.bit(i) {
                acc = self.add_mixed(&acc, p);
            }
        }
        acc
    }

    /// Maps a point of the full curve group into the prime-order subgroup.
    pub fn clear_cofactor(&self, p: &AffinePoint<N>) -> ProjectivePoint<N> {
        self.scalar_mul(p, &self.cofactor)
    }

    /// Whether the canonical integer of `x` is odd.
    pub fn is_odd(&self, x: &FieldElement<N>) -> bool {
        self.base.to_canonical_limbs(x)[0] & 1 == 1
    }

    /// The compressed form of a point: `x` and the parity of `y` on
    /// Weierstraß curves, `y` and the parity of `x` on Edwards curves.
    pub fn compress(&self, p: &AffinePoint<N>) -> (FieldElement<N>, bool) {
        match self.family {
            CurveFamily::ShortWeierstrass { .. } => (p.x, self.is_odd(&p.y)),
            CurveFamily::TwistedEdwards { .. } => (p.y, self.is_odd(&p.x)),
        }
    }

    /// Inverse of [`Self::compress`]. Returns `None` if no point has the
    /// given coordinate.
    pub fn decompress(&self, coordinate: &FieldElement<N>, odd: bool) -> Option<AffinePoint<N>> {
        let f = &self.base;
        match &self.family {
            CurveFamily::ShortWeierstrass { b, .. } => {
                let mut y = f.sqrt(&weierstrass::rhs(f, b, coordinate))?;
                if self.is_odd(&y) != odd {
                    y = f.neg(&y);
                }
                Some(AffinePoint::new(*coordinate, y))
            }
            CurveFamily::TwistedEdwards { d, .. } => {
                // x^2 = (y^2 - 1) / (d y^2 + 1)
                let y2 = f.square(coordinate);
                let num = f.sub(&y2, &f.one());
                let den = f.add(&f.mul(d, &y2), &f.one());
                let mut x = f.sqrt(&f.mul(&num, &f.inverse(&den)?))?;
                if self.is_odd(&x) != odd {
                    if f.is_zero(&x) {
                        return None;
                    }
                    x = f.neg(&x);
                }
                let infinity = f.is_zero(&x) && f.is_one(coordinate);
                Some(AffinePoint {
                    x,
                    y: *coordinate,
                    infinity,
                })
            }
        }
    }
}
