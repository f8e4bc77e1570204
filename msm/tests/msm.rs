//! End-to-end tests of the single-threaded MSM.

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use bucket_msm::{msm, msm_unsafe, reference::msm_naive, MsmError, MsmOptions};
use msm_curves::{presets, AffinePoint, Curve, FieldElement, LIMBS_255, LIMBS_381};
use msm_utils::tests::make_test_rng;
use rand::rngs::StdRng;
use std::sync::OnceLock;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bn254() -> &'static Curve<LIMBS_255> {
    static CURVE: OnceLock<Curve<LIMBS_255>> = OnceLock::new();
    CURVE.get_or_init(|| presets::bn254().unwrap())
}

fn ed25519() -> &'static Curve<LIMBS_255> {
    static CURVE: OnceLock<Curve<LIMBS_255>> = OnceLock::new();
    CURVE.get_or_init(|| presets::ed25519().unwrap())
}

fn random_input<const N: usize>(
    curve: &Curve<N>,
    rng: &mut StdRng,
    n: usize,
) -> (Vec<FieldElement<N>>, Vec<AffinePoint<N>>) {
    let fr = curve.scalar_field();
    let scalars = (0..n).map(|_| fr.random(rng)).collect();
    (scalars, curve.random_points_fast(rng, n))
}

fn naive<const N: usize>(
    curve: &Curve<N>,
    scalars: &[FieldElement<N>],
    points: &[AffinePoint<N>],
) -> AffinePoint<N> {
    curve.to_affine(&msm_naive(curve, scalars, points).unwrap())
}

fn to_ark(p: &AffinePoint<LIMBS_255>) -> ark_bn254::G1Affine {
    match bn254().coordinates(p) {
        Some((x, y)) => ark_bn254::G1Affine::new_unchecked(x.into(), y.into()),
        None => ark_bn254::G1Affine::zero(),
    }
}

// ============================================================================
// Agreement with the references
// ============================================================================

#[test]
fn test_matches_naive_msm() {
    init_logger();
    let mut rng = make_test_rng(None);
    for curve in [bn254(), ed25519()] {
        for n in [1, 2, 8, 256] {
            let (scalars, points) = random_input(curve, &mut rng, n);
            let expected = naive(curve, &scalars, &points);
            let result = msm(curve, &scalars, &points, &MsmOptions::default()).unwrap();
            assert_eq!(result, expected, "{} with n = {n}", curve.name());
        }
    }
}

#[test]
fn test_matches_arkworks() {
    let mut rng = make_test_rng(None);
    let curve = bn254();
    let (scalars, points) = random_input(curve, &mut rng, 100);

    let bases: Vec<_> = points.iter().map(to_ark).collect();
    let frs: Vec<_> = scalars
        .iter()
        .map(|k| ark_bn254::Fr::from(curve.scalar_field().to_biguint(k)))
        .collect();
    let expected = ark_bn254::G1Projective::msm(&bases, &frs)
        .unwrap()
        .into_affine();

    let result = msm(curve, &scalars, &points, &MsmOptions::default()).unwrap();
    assert_eq!(to_ark(&result), expected);
}

#[test]
fn test_wide_field_curve() {
    let mut rng = make_test_rng(None);
    let curve: Curve<LIMBS_381> = presets::bls12_381().unwrap();
    let (scalars, points) = random_input(&curve, &mut rng, 40);
    let expected = naive(&curve, &scalars, &points);
    assert_eq!(
        msm(&curve, &scalars, &points, &MsmOptions::default()).unwrap(),
        expected
    );
    assert_eq!(
        msm_unsafe(&curve, &scalars, &points, &MsmOptions::default()).unwrap(),
        expected
    );
}

// ============================================================================
// Edge cases of the complete addition
// ============================================================================

#[test]
fn test_repeated_point_reduces_modulo_the_order() {
    let mut rng = make_test_rng(None);
    for curve in [bn254(), ed25519()] {
        let fr = curve.scalar_field();
        let p = curve.random_point(&mut rng);
        // 2P + (q - 1)P = P
        let scalars = [fr.from_u64(2), fr.neg(&fr.one())];
        for options in [MsmOptions::default(), MsmOptions::default().without_glv()] {
            assert_eq!(msm(curve, &scalars, &[p, p], &options).unwrap(), p);
        }
        // P + (q - 1)P = 0
        let scalars = [fr.one(), fr.neg(&fr.one())];
        let sum = msm(curve, &scalars, &[p, p], &MsmOptions::default()).unwrap();
        assert!(sum.is_identity());
    }
}

#[test]
fn test_zero_terms() {
    let mut rng = make_test_rng(None);
    let curve = ed25519();
    let fr = curve.scalar_field();
    let (mut scalars, mut points) = random_input(curve, &mut rng, 8);

    assert!(msm(curve, &[], &[], &MsmOptions::default())
        .unwrap()
        .is_identity());
    let zeros = vec![fr.zero(); 8];
    assert!(msm(curve, &zeros, &points, &MsmOptions::default())
        .unwrap()
        .is_identity());

    scalars[3] = fr.zero();
    points[5] = curve.affine_identity();
    let expected = naive(curve, &scalars, &points);
    assert_eq!(
        msm(curve, &scalars, &points, &MsmOptions::default()).unwrap(),
        expected
    );
    assert_eq!(
        msm_unsafe(curve, &scalars, &points, &MsmOptions::default()).unwrap(),
        expected
    );
}

#[test]
fn test_small_scalars() {
    let mut rng = make_test_rng(None);
    let curve = bn254();
    let fr = curve.scalar_field();
    let points = curve.random_points_fast(&mut rng, 64);
    let scalars: Vec<_> = (0..64u64).map(|i| fr.from_u64(i % 5)).collect();
    assert_eq!(
        msm(curve, &scalars, &points, &MsmOptions::default()).unwrap(),
        naive(curve, &scalars, &points)
    );
}

// ============================================================================
// Invariance under the tuning knobs
// ============================================================================

#[test]
fn test_window_choice_does_not_change_the_result() {
    let mut rng = make_test_rng(None);
    let curve = bn254();
    let (scalars, points) = random_input(curve, &mut rng, 64);
    let expected = msm(curve, &scalars, &points, &MsmOptions::default()).unwrap();
    for (c, c0) in [(1, 0), (3, 1), (4, 0), (4, 3), (7, 3), (10, 5), (16, 8)] {
        for options in [
            MsmOptions::default().with_window(c, c0),
            MsmOptions::default().with_window(c, c0).without_glv(),
        ] {
            assert_eq!(
                msm(curve, &scalars, &points, &options).unwrap(),
                expected,
                "{options:?}"
            );
        }
    }
}

#[test]
fn test_unsafe_agrees_on_distinct_points() {
    let mut rng = make_test_rng(None);
    for curve in [bn254(), ed25519()] {
        let (scalars, points) = random_input(curve, &mut rng, 200);
        let options = MsmOptions::default();
        assert_eq!(
            msm_unsafe(curve, &scalars, &points, &options).unwrap(),
            msm(curve, &scalars, &points, &options).unwrap()
        );
    }
}

#[test]
fn test_copies_of_one_point_sum_their_scalars() {
    let mut rng = make_test_rng(None);
    for curve in [bn254(), ed25519()] {
        let fr = curve.scalar_field();
        let p = curve.random_point(&mut rng);
        let scalars: Vec<_> = (0..50).map(|_| fr.random(&mut rng)).collect();
        let total = scalars.iter().fold(fr.zero(), |acc, k| fr.add(&acc, k));

        let copies = vec![p; scalars.len()];
        let options = MsmOptions::default();
        assert_eq!(
            msm(curve, &scalars, &copies, &options).unwrap(),
            msm(curve, &[total], &[p], &options).unwrap()
        );
    }
}

#[test]
fn test_msm_is_linear_in_the_scalars() {
    let mut rng = make_test_rng(None);
    let curve = ed25519();
    let fr = curve.scalar_field();
    let (a, points) = random_input(curve, &mut rng, 32);
    let (b, _) = random_input(curve, &mut rng, 32);
    let sum: Vec<_> = a.iter().zip(&b).map(|(x, y)| fr.add(x, y)).collect();

    let options = MsmOptions::default();
    let lhs = msm(curve, &sum, &points, &options).unwrap();
    let rhs = curve.add_affine(
        &msm(curve, &a, &points, &options).unwrap(),
        &msm(curve, &b, &points, &options).unwrap(),
    );
    assert_eq!(lhs, rhs);

    // scaling every scalar by 3 triples the result
    let three = fr.from_u64(3);
    let tripled: Vec<_> = a.iter().map(|x| fr.mul(x, &three)).collect();
    let once = msm(curve, &a, &points, &options).unwrap();
    assert_eq!(
        msm(curve, &tripled, &points, &options).unwrap(),
        curve.to_affine(&curve.scalar_mul(&once, &3u8.into()))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_rejects_bad_input() {
    let curve = bn254();
    let fr = curve.scalar_field();
    let g = *curve.generator();

    assert_eq!(
        msm(curve, &[fr.one(), fr.one()], &[g], &MsmOptions::default()),
        Err(MsmError::LengthMismatch {
            scalars: 2,
            points: 1
        })
    );
    let options = MsmOptions::default().with_window(25, 3);
    assert_eq!(
        msm(curve, &[fr.one()], &[g], &options),
        Err(MsmError::InvalidWindow {
            window_bits: 25,
            sub_window_bits: 3
        })
    );
    let options = MsmOptions::default().with_window(6, 6);
    assert!(matches!(
        msm_unsafe(curve, &[fr.one()], &[g], &options),
        Err(MsmError::InvalidWindow { .. })
    ));
}
