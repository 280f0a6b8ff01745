//! Rank-revealing factorization of positive semidefinite matrices

use clarabel::algebra::FloatT;
use totsu_core::{FloatGeneric, LinAlgEx};
use crate::{CscMat, QpError};

/// Factorizes a symmetric positive semidefinite \\(P\\) as \\(P = R^T R\\).
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// \\(P\\) is normalized by \\(\max_{ij} |P_{ij}|\\) and eigendecomposed as \\(P = \sum_i \lambda_i z_i z_i^T\\).
/// Each eigenvalue \\(\lambda_i > \epsilon\\) gives a row \\(\sqrt{\lambda_i} z_i^T\\) of \\(R\\),
/// and \\(\lambda_i < -\epsilon\\) means that \\(P\\) is indefinite.
///
/// Returns \\(R \in \mathbb{R}^{r \times n}\\) where \\(r\\) is the numerical rank of \\(P\\),
/// [`QpError::Factorization`] with the index of the offending eigenvalue,
/// or [`QpError::NonFinite`] if \\(P\\) has an infinite or `NaN` entry.
/// * `sym_p` is \\(P\\). Only its symmetric part \\((P + P^T) / 2\\) is referred.
/// * `eps_zero` is \\(\epsilon\\).
pub fn psd_factor<F: FloatT>(sym_p: &CscMat<F>, eps_zero: F) -> Result<CscMat<F>, QpError>
{
    let (n, n_) = sym_p.size();
    if n != n_ {
        return Err(QpError::shape("P", (n, n), (n, n_)));
    }
    if let Some((row, col)) = sym_p.find_non_finite() {
        return Err(QpError::NonFinite {name: "P", row, col});
    }

    let scale = sym_p.max_abs();
    if scale == F::zero() {
        log::debug!("P is zero: rank 0");
        return Ok(CscMat::zeros((0, n)));
    }

    // upper triangle packed column-wise
    let mut sympack = vec![F::zero(); n * (n + 1) / 2];
    for (r, c, v) in sym_p.sym_part().iter().filter(|&(r, c, _)| r <= c) {
        sympack[c * (c + 1) / 2 + r] = v / scale;
    }

    let mut work = vec![F::zero(); FloatGeneric::<F>::map_eig_worklen(n)];
    let eps_jacobi = eps_zero.max(F::epsilon());
    FloatGeneric::<F>::map_eig(&mut sympack, None, eps_jacobi, &mut work, |_| None);

    // eigenvalues in work[..n], then eigenvectors column by column
    let (eig_w, eig_z) = work.split_at(n);

    let mut triplets = Vec::new();
    let mut rank = 0;
    for (i, &w) in eig_w.iter().enumerate() {
        if w < -eps_zero {
            log::debug!("eigenvalue {:e} at {} with tolerance {:e}", w * scale, i, eps_zero * scale);
            return Err(QpError::Factorization {
                index: i,
                value: (w * scale).to_f64().unwrap_or(f64::NAN),
                tol: (eps_zero * scale).to_f64().unwrap_or(f64::NAN),
            });
        }
        else if w > eps_zero {
            let sqrt_w = (w * scale).sqrt();
            let z = &eig_z[i * n.. (i + 1) * n];
            triplets.extend(z.iter().enumerate().map(|(j, &zj)| (rank, j, sqrt_w * zj)));
            rank += 1;
        }
    }

    log::debug!("P factorized: size {}, rank {}", n, rank);
    Ok(CscMat::from_triplets(rank, n, triplets))
}

//

#[test]
fn test_psd_factor1()
{
    use float_eq::assert_float_eq;

    // P = M^T M
    let m = [
        1., 2., 0.,
        -8., 3., 2.,
        0., 1., 1.,
    ];
    let p = CscMat::from_triplets(3, 3, (0.. 3).flat_map(|i| (0.. 3).map(move |j| {
        let v = (0.. 3).map(|k| m[k * 3 + i] * m[k * 3 + j]).sum::<f64>();
        (i, j, v)
    })));

    let r = psd_factor(&p, 1e-12).unwrap();
    assert_eq!(r.size(), (3, 3));

    for j in 0.. 3 {
        let mut ej = vec![0.; 3];
        ej[j] = 1.;
        let mut rtr_ej = vec![0.; 3];
        r.trans_mul_add(1., &r.mul_vec(&ej), 0., &mut rtr_ej);
        let p_ej = p.mul_vec(&ej);
        assert_float_eq!(rtr_ej.as_slice(), p_ej.as_slice(), abs_all <= 1e-8);
    }
}

#[test]
fn test_psd_factor_rank_deficient()
{
    use float_eq::assert_float_eq;

    // P = v v^T + w w^T
    let v = [1., -1., 2., 0.];
    let w = [0., 1., 1., 3.];
    let p = CscMat::from_triplets(4, 4, (0.. 4).flat_map(|i| (0.. 4).map(move |j| {
        (i, j, v[i] * v[j] + w[i] * w[j])
    })));

    let r = psd_factor(&p, 1e-10).unwrap();
    assert_eq!(r.size(), (2, 4));

    let x = [0.3, -1.2, 0.7, 2.];
    let rx = r.mul_vec(&x);
    let xpx: f64 = x.iter().zip(p.mul_vec(&x)).map(|(a, b)| a * b).sum();
    assert_float_eq!(rx.iter().map(|e| e * e).sum::<f64>(), xpx, abs <= 1e-7);
}

#[test]
fn test_psd_factor_zero()
{
    let r = psd_factor(&CscMat::<f64>::zeros((3, 3)), 1e-12).unwrap();
    assert_eq!(r.size(), (0, 3));
}

#[test]
fn test_psd_factor_indefinite()
{
    let p = CscMat::from_triplets(2, 2, [(0, 0, 1.), (1, 1, -1.)]);
    let e = psd_factor(&p, 1e-12).unwrap_err();
    assert!(matches!(e, QpError::Factorization {index: 1, value, ..} if value == -1.));

    let p = CscMat::from_triplets(2, 2, [(0, 1, 1.), (1, 0, 1.)]);
    assert!(psd_factor(&p, 1e-12).is_err());
}

#[test]
fn test_psd_factor_scaled()
{
    use float_eq::assert_float_eq;

    // diag(4e6, 0, 1e-3): the smallest eigenvalue is below the relative tolerance
    let p = CscMat::<f64>::from_triplets(3, 3, [(0, 0, 4e6), (2, 2, 1e-3)]);

    let r = psd_factor(&p, 1e-9).unwrap();
    assert_eq!(r.size(), (1, 3));
    assert_float_eq!(r.get(0, 0).abs(), 2e3, rmax <= 1e-12);

    let r = psd_factor(&p, 1e-12).unwrap();
    assert_eq!(r.size(), (2, 3));
}

#[test]
fn test_psd_factor_nan()
{
    let p = CscMat::from_triplets(1, 1, [(0, 0, f64::NAN)]);
    assert_eq!(psd_factor(&p, 1e-12).unwrap_err(), QpError::NonFinite {name: "P", row: 0, col: 0});

    let p = CscMat::from_triplets(2, 2, [(0, 0, 1.), (1, 0, f64::INFINITY)]);
    assert_eq!(psd_factor(&p, 1e-12).unwrap_err(), QpError::NonFinite {name: "P", row: 1, col: 0});
}
