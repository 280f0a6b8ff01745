use float_eq::assert_float_eq;
use qpsocp::prelude::*;
use qpsocp::*;

//

const BACKENDS: &[&str] = &["clarabel", "clarabel_qp"];

/// P = M^T M, q = [3, 2, 3] M, with G x <= h and A x = b.
fn fixture() -> (MatBuild<f64>, Vec<f64>, MatBuild<f64>, Vec<f64>, MatBuild<f64>, Vec<f64>)
{
    let n = 3;

    let m = MatBuild::<f64>::new(MatType::General(n, n)).iter_rowmaj(&[
        1., 2., 0.,
        -8., 3., 2.,
        0., 1., 1.,
    ]);

    let sym_p = MatBuild::<f64>::new(MatType::SymPack(n))
        .by_fn(|r, c| (0.. n).map(|k| m[(k, r)] * m[(k, c)]).sum());

    let vec_q = (0.. n).map(|c| 3. * m[(0, c)] + 2. * m[(1, c)] + 3. * m[(2, c)]).collect();

    let mat_g = MatBuild::<f64>::new(MatType::General(3, n)).iter_rowmaj(&[
        1., 2., 1.,
        2., 0., 1.,
        -1., 2., -1.,
    ]);
    let vec_h = vec![3., 2., -2.];

    let mat_a = MatBuild::<f64>::new(MatType::General(1, n)).iter_rowmaj(&[1., 1., 1.]);
    let vec_b = vec![1.];

    (sym_p, vec_q, mat_g, vec_h, mat_a, vec_b)
}

fn solve_x(reg: &Registry, name: &str, qp: &ProbQP<f64>) -> Vec<f64>
{
    let rslt = reg.solve(name, qp, &SolveOptions::default()).unwrap();
    println!("{}: {:?}", name, rslt);

    assert_eq!(rslt.backend, name);
    rslt.solution.into_x().unwrap()
}

//

#[test]
fn test_qp_full()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (p, q, g, h, a, b) = fixture();
    let qp = ProbQP::new(p, q).with_ineq(g, h).with_eq(a, b);

    let reg = Registry::with_defaults();
    for name in BACKENDS {
        let x = solve_x(&reg, name, &qp);
        assert_float_eq!(x.as_slice(), [0.30769231, -0.69230769, 1.38461538].as_ref(), abs_all <= 1e-4);
    }
}

#[test]
fn test_qp_full_totsu()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (p, q, g, h, a, b) = fixture();
    let qp = ProbQP::new(p, q).with_ineq(g, h).with_eq(a, b);

    let mut reg = Registry::with_defaults();
    reg.set_option("totsu", "max_iter", "1000000").unwrap();

    let x = solve_x(&reg, "totsu", &qp);
    assert_float_eq!(x.as_slice(), [0.30769231, -0.69230769, 1.38461538].as_ref(), abs_all <= 5e-3);
}

#[test]
fn test_qp_no_cons()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (p, q, _, _, _, _) = fixture();
    let qp = ProbQP::new(p, q);

    let reg = Registry::with_defaults();
    for name in BACKENDS {
        let x = solve_x(&reg, name, &qp);
        assert_float_eq!(x.as_slice(), [-0.64705882, -1.17647059, -1.82352941].as_ref(), abs_all <= 1e-4);
    }
}

#[test]
fn test_qp_no_eq()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (p, q, g, h, _, _) = fixture();
    let qp = ProbQP::new(p, q).with_ineq(g, h);

    let reg = Registry::with_defaults();
    for name in BACKENDS {
        let x = solve_x(&reg, name, &qp);
        assert_float_eq!(x.as_slice(), [-0.49025721, -1.57755261, -0.66484801].as_ref(), abs_all <= 1e-4);
    }
}

#[test]
fn test_qp_no_ineq()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (p, q, _, _, a, b) = fixture();
    let qp = ProbQP::new(p, q).with_eq(a, b);

    let reg = Registry::with_defaults();
    for name in BACKENDS {
        let x = solve_x(&reg, name, &qp);
        assert_float_eq!(x.as_slice(), [0.28026906, -1.55156951, 2.27130045].as_ref(), abs_all <= 1e-4);
    }
}

#[test]
fn test_qp_one_ineq()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // the only active row of G
    let (p, q, _, _, a, b) = fixture();
    let g = CscMat::<f64>::from_colmaj(1, 3, &[2., 0., 1.]);
    let qp = ProbQP::new(p, q).with_ineq(g, vec![2.]).with_eq(a, b);

    let reg = Registry::with_defaults();
    for name in BACKENDS {
        let x = solve_x(&reg, name, &qp);
        assert_float_eq!(x.as_slice(), [0.30769231, -0.69230769, 1.38461538].as_ref(), abs_all <= 1e-4);
    }
}

#[test]
fn test_qp_objective_agrees()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (p, q, g, h, a, b) = fixture();
    let qp = ProbQP::new(p, q).with_ineq(g, h).with_eq(a, b);

    let reg = Registry::with_defaults();
    let x_conic = solve_x(&reg, "clarabel", &qp);
    let x_direct = solve_x(&reg, "clarabel_qp", &qp);

    let f_conic = qp.objective(&x_conic).unwrap();
    let f_direct = qp.objective(&x_direct).unwrap();
    assert_float_eq!(f_conic, f_direct, rmax <= 1e-5);
}

#[test]
fn test_qp_sparse()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let n = 150;

    // M = I with M[i, i+1] = -1 and M[i, i-1] = 1 for 0 < i < n - 1, P = M M^T
    let mut trip = Vec::new();
    for i in 0.. n {
        trip.push((i, i, 1.));
        if i > 0 && i < n - 1 {
            trip.push((i, i + 1, -1.));
            trip.push((i, i - 1, 1.));
        }
    }
    let m = CscMat::<f64>::from_triplets(n, n, trip);

    let mut p_trip = Vec::new();
    for c in 0.. n {
        // column c of M M^T is M times row c of M
        let row_c: Vec<f64> = (0.. n).map(|k| m.get(c, k)).collect();
        let col = m.mul_vec(&row_c);
        p_trip.extend(col.into_iter().enumerate().map(|(r, v)| (r, c, v)));
    }
    let p = CscMat::from_triplets(n, n, p_trip);

    let g = CscMat::<f64>::from_triplets(n, n, (0.. n).map(|i| (i, i, -1.)));
    let qp = ProbQP::new(p, vec![-1.; n]).with_ineq(g, vec![-2.; n]);

    let mut expected = vec![2.; n];
    expected[n - 1] = 3.;

    let reg = Registry::with_defaults();
    for name in BACKENDS {
        let x = solve_x(&reg, name, &qp);
        // the direct route stops around 1.5e-4 away with default tolerances
        assert_float_eq!(x.as_slice(), expected.as_slice(), abs_all <= 1e-3);
    }
}
