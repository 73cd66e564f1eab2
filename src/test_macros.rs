macro_rules! generate_tests {
    ($name:ident, $scalar:ty, $method:expr) => {
        #[cfg(test)]
        mod $name {
            use ndarray::prelude::*;
            use num_traits::{One, ToPrimitive, Zero};

            #[allow(unused_imports)]
            use super::*;
            use crate::test_utils::*;
            use crate::{Error, Orthogonalize, Scalar};

            type A = $scalar;

            const N: usize = 10;
            const K: usize = 3;

            fn tolerance() -> f64 {
                <A as Sample>::TOLERANCE
            }

            fn random_problem() -> (Array2<A>, Array1<A>) {
                let mut rng = rng();
                let basis = random_orthonormal_basis::<A>(N, K, &mut rng);
                let v = random_vector::<A>(N, &mut rng);
                (basis, v)
            }

            // v = Q·c for the first K unit vectors, so the residual is exactly zero.
            fn vector_in_span() -> (Array2<A>, Array1<A>) {
                let mut rng = rng();
                let basis = unit_columns::<A>(N, K);
                let mut v = Array1::<A>::zeros(N);
                for i in 0..K {
                    v[i] = A::sample(&mut rng);
                }
                (basis, v)
            }

            #[test]
            fn result_has_unit_norm() {
                let (basis, mut v) = random_problem();
                let mut r = Array1::zeros(K);
                let mut method = $method;

                method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();

                let length = euclidean_norm(&v).to_f64().unwrap();
                assert!((length - 1.0).abs() < tolerance());
            }

            #[test]
            fn result_is_orthogonal_to_basis() {
                let (basis, mut v) = random_problem();
                let mut r = Array1::zeros(K);
                let mut method = $method;

                method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();

                assert!(projection_norm(&basis, &v) < tolerance());
            }

            #[test]
            fn decomposition_returns_original() {
                let (basis, mut v) = random_problem();
                let original = v.clone();
                let mut r = Array1::zeros(K);
                let mut method = $method;

                let out = method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();

                let norm = out.residual_norm();
                assert!(reconstruction_error(&basis, &r, norm, &v, &original) < tolerance());
            }

            #[test]
            fn coefficients_are_overwritten() {
                let (basis, mut v) = random_problem();
                let expected = adjoint_times(&basis, &v);
                let mut r = Array1::from_elem(K, A::from_real(<A as Scalar>::Real::one()));
                let mut method = $method;

                method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();

                let difference = euclidean_norm(&(&r - &expected)).to_f64().unwrap();
                assert!(difference < tolerance());
            }

            #[test]
            fn buffers_can_be_reused() {
                let mut rng = rng();
                let basis = random_orthonormal_basis::<A>(N, K, &mut rng);
                let mut r = Array1::zeros(K);
                let mut method = $method;

                for _ in 0..3 {
                    let mut v = random_vector::<A>(N, &mut rng);
                    method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();
                    assert!(projection_norm(&basis, &v) < tolerance());
                }
            }

            #[test]
            fn empty_basis_only_normalizes() {
                let (_, mut v) = random_problem();
                let length = euclidean_norm(&v).to_f64().unwrap();
                let basis = Array2::<A>::zeros((N, 0));
                let mut r = Array1::<A>::zeros(0);
                let mut method = $method;

                let out = method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();

                let norm = out.residual_norm().to_f64().unwrap();
                assert!((norm - length).abs() < tolerance() * length);
                assert!((euclidean_norm(&v).to_f64().unwrap() - 1.0).abs() < tolerance());
            }

            #[test]
            fn rejects_target_of_wrong_length() {
                let (basis, _) = random_problem();
                let mut v = Array1::<A>::ones(N + 1);
                let mut r = Array1::zeros(K);
                let mut method = $method;

                let err = method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap_err();

                assert_eq!(err, Error::TargetLength { basis: N, target: N + 1 });
                assert!(v.iter().all(|x| *x == A::one()));
            }

            #[test]
            fn rejects_coefficients_of_wrong_length() {
                let (basis, mut v) = random_problem();
                let mut r = Array1::zeros(K + 1);
                let mut method = $method;

                let err = method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap_err();

                assert_eq!(err, Error::CoefficientLength { expected: K, got: K + 1 });
            }

            #[test]
            fn vector_in_span_is_not_finite() {
                let (basis, mut v) = vector_in_span();
                let mut r = Array1::zeros(K);
                let mut method = $method;

                let out = method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap();

                assert_eq!(out.residual_norm(), <A as Scalar>::Real::zero());
                assert!(v.iter().all(|x| x.re().is_nan()));
            }

            #[test]
            fn strict_mode_rejects_vector_in_span() {
                let (basis, mut v) = vector_in_span();
                let mut r = Array1::zeros(K);
                let mut method = ($method).strict();

                let err = method.orthogonalize_and_normalize(&basis, &mut v, &mut r).unwrap_err();

                assert_eq!(err, Error::DegenerateNorm { norm: 0.0 });
                assert!(v.iter().all(|x| *x == A::zero()));
            }
        }
    };
}
