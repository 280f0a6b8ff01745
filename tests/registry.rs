use qpsocp::prelude::*;
use qpsocp::*;

//

fn simple_qp() -> ProbQP<f64>
{
    ProbQP::new(CscMat::<f64>::identity(2), vec![-1., -1.])
        .with_ineq(CscMat::<f64>::from_colmaj(1, 2, &[1., 1.]), vec![1.])
}

#[test]
fn test_unknown_backend()
{
    let reg = Registry::with_defaults();
    let e = reg.solve("ideal", &simple_qp(), &SolveOptions::default()).unwrap_err();

    assert_eq!(e, QpError::UnknownBackend("ideal".to_string()));
    assert_eq!(e.to_string(), "UnknownBackend: ideal");
}

#[test]
fn test_options()
{
    let mut reg = Registry::with_defaults();

    assert!(reg.set_option("clarabel", "tol_feas", "1e-9").is_ok());
    assert!(reg.set_option("clarabel", "reduction_eps_zero", "1e-10").is_ok());
    assert!(matches!(
        reg.set_option("clarabel_qp", "reduction_eps_zero", "1e-10"),
        Err(QpError::UnknownOption {backend: "clarabel_qp", ..})
    ));
    assert!(matches!(
        reg.set_option("totsu", "eps_acc", "small"),
        Err(QpError::InvalidOption {backend: "totsu", ..})
    ));
    assert!(matches!(reg.set_option("ideal", "max_iter", "1"), Err(QpError::UnknownBackend(_))));
}

#[test]
fn test_warm_start_ignored()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = Registry::with_defaults();
    let opts = SolveOptions {
        initvals: Some(vec![0.5, 0.5]),
        ..Default::default()
    };

    let rslt = reg.solve("clarabel_qp", &simple_qp(), &opts).unwrap();
    assert_eq!(rslt.notices.first(), Some(&Notice::WarmStartIgnored));
    assert!(rslt.solution.is_optimal());
}

#[test]
fn test_malformed()
{
    let qp = ProbQP::new(CscMat::<f64>::identity(2), vec![-1., -1.])
        .with_eq(CscMat::<f64>::identity(3), vec![1., 1., 1.]);

    let reg = Registry::with_defaults();
    for name in reg.names() {
        let e = reg.solve(name, &qp, &SolveOptions::default()).unwrap_err();
        assert!(matches!(e, QpError::Shape {name: "A", ..}));
    }
}

#[test]
fn test_non_finite_p()
{
    // a NaN in P is not taken as zero
    let qp = ProbQP::new(CscMat::<f64>::from_colmaj(1, 1, &[f64::NAN]), vec![1.])
        .with_lb(vec![0.]);

    assert_eq!(qp.check(), Err(QpError::NonFinite {name: "P", row: 0, col: 0}));

    let reg = Registry::with_defaults();
    for name in reg.names() {
        let e = reg.solve(name, &qp, &SolveOptions::default()).unwrap_err();
        assert_eq!(e, QpError::NonFinite {name: "P", row: 0, col: 0});
    }
}

#[test]
fn test_custom_backend()
{
    struct Fixed;

    impl QpBackend for Fixed
    {
        fn name(&self) -> &'static str
        {
            "fixed"
        }

        fn capability(&self) -> Capability
        {
            Capability::Qp
        }

        fn set_option(&mut self, key: &str, _value: &str) -> Result<(), QpError>
        {
            Err(QpError::UnknownOption {backend: "fixed", key: key.to_string()})
        }

        fn solve(&self, qp: &ProbQP<f64>, _opts: &SolveOptions) -> Result<SolveReport<f64>, QpError>
        {
            qp.check()?;
            Ok(SolveReport {
                backend: self.name(),
                solution: Solution::Optimal(vec![0.; qp.n()]),
                notices: Vec::new(),
            })
        }
    }

    let mut reg = Registry::new();
    assert!(reg.register(Fixed).is_none());
    assert_eq!(reg.names(), vec!["fixed"]);

    let rslt = reg.solve("fixed", &simple_qp(), &SolveOptions::default()).unwrap();
    assert_eq!(rslt.solution.into_x(), Some(vec![0., 0.]));
}
