use core::str::FromStr;
use crate::QpError;

/// Parameters of [`crate::TotsuBackend`], which are those of [`totsu_core::solver::Solver`].
pub type TotsuParam = totsu_core::solver::SolverParam<f64>;

/// Parameters of [`crate::ClarabelBackend`], which are those of [`clarabel::solver::DefaultSolver`].
pub type ClarabelParam = clarabel::solver::DefaultSettings<f64>;

/// Parameters of the reduction from a QP to a cone program.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionParam
{
    /// Relative tolerance to determine the rank of \\(P\\).
    pub eps_zero: f64,
}

impl Default for ReductionParam
{
    fn default() -> Self
    {
        ReductionParam {
            eps_zero: 1e-9,
        }
    }
}

//

/// Option keys of [`ReductionParam`], shared by the cone program backends.
pub const REDUCTION_KEYS: &[&str] = &["reduction_eps_zero"];

/// Option keys of [`TotsuParam`].
pub const TOTSU_KEYS: &[&str] = &["max_iter", "eps_acc", "eps_inf", "eps_zero", "log_period"];

/// Option keys of [`ClarabelParam`].
pub const CLARABEL_KEYS: &[&str] = &[
    "max_iter", "time_limit", "verbose",
    "tol_gap_abs", "tol_gap_rel", "tol_feas", "tol_infeas_abs", "tol_infeas_rel", "tol_ktratio",
    "equilibrate_enable",
];

fn parse<T: FromStr>(backend: &'static str, key: &str, value: &str) -> Result<T, QpError>
{
    value.trim().parse().map_err(|_| QpError::InvalidOption {
        backend,
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn unknown(backend: &'static str, key: &str) -> QpError
{
    QpError::UnknownOption {
        backend,
        key: key.to_string(),
    }
}

/// Sets a [`ReductionParam`] by a key/value pair.
///
/// Returns `Ok(true)` if `key` is of [`REDUCTION_KEYS`] and set, `Ok(false)` if not of them.
pub fn set_reduction_option(p: &mut ReductionParam, backend: &'static str, key: &str, value: &str) -> Result<bool, QpError>
{
    match key {
        "reduction_eps_zero" => p.eps_zero = parse(backend, key, value)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Sets a [`TotsuParam`] by a key/value pair.
///
/// `max_iter` takes `none` for no upper limit.
pub fn set_totsu_option(p: &mut TotsuParam, key: &str, value: &str) -> Result<(), QpError>
{
    const B: &str = "totsu";

    match key {
        "max_iter" => p.max_iter = if value.trim().eq_ignore_ascii_case("none") {
            None
        }
        else {
            Some(parse(B, key, value)?)
        },
        "eps_acc" => p.eps_acc = parse(B, key, value)?,
        "eps_inf" => p.eps_inf = parse(B, key, value)?,
        "eps_zero" => p.eps_zero = parse(B, key, value)?,
        "log_period" => p.log_period = parse(B, key, value)?,
        _ => return Err(unknown(B, key)),
    }
    Ok(())
}

/// Sets a [`ClarabelParam`] by a key/value pair.
pub fn set_clarabel_option(p: &mut ClarabelParam, backend: &'static str, key: &str, value: &str) -> Result<(), QpError>
{
    match key {
        "max_iter" => p.max_iter = parse(backend, key, value)?,
        "time_limit" => p.time_limit = parse(backend, key, value)?,
        "verbose" => p.verbose = parse(backend, key, value)?,
        "tol_gap_abs" => p.tol_gap_abs = parse(backend, key, value)?,
        "tol_gap_rel" => p.tol_gap_rel = parse(backend, key, value)?,
        "tol_feas" => p.tol_feas = parse(backend, key, value)?,
        "tol_infeas_abs" => p.tol_infeas_abs = parse(backend, key, value)?,
        "tol_infeas_rel" => p.tol_infeas_rel = parse(backend, key, value)?,
        "tol_ktratio" => p.tol_ktratio = parse(backend, key, value)?,
        "equilibrate_enable" => p.equilibrate_enable = parse(backend, key, value)?,
        _ => return Err(unknown(backend, key)),
    }
    Ok(())
}

//

/// Value of an environment variable, if set.
pub fn str_by_env(e: &str) -> Option<String>
{
    if let Ok(v) = std::env::var(e) {
        log::info!("{}: {}", e, v);
        Some(v)
    }
    else {
        None
    }
}

/// Sets options from environment variables named `{prefix}_{KEY}`.
///
/// Returns `Ok`, or the first error of `set`.
/// * `prefix` is prepended to each key in upper case.
/// * `keys` are option keys to look up.
/// * `set` sets a key/value pair.
pub fn set_by_env<S>(prefix: &str, keys: &[&str], mut set: S) -> Result<(), QpError>
where S: FnMut(&str, &str) -> Result<(), QpError>
{
    for key in keys {
        let e = format!("{}_{}", prefix, key.to_uppercase());
        if let Some(v) = str_by_env(&e) {
            set(key, &v)?;
        }
    }
    Ok(())
}

/// Sets a [`TotsuParam`] from `TOTSU_MAX_ITER`, `TOTSU_EPS_ACC`, `TOTSU_EPS_INF`,
/// `TOTSU_EPS_ZERO` and `TOTSU_LOG_PERIOD`.
pub fn totsu_par_by_env(p: &mut TotsuParam) -> Result<(), QpError>
{
    set_by_env("TOTSU", TOTSU_KEYS, |k, v| set_totsu_option(p, k, v))
}

/// Sets a [`ClarabelParam`] from `CLARABEL_{KEY}` variables of [`CLARABEL_KEYS`].
pub fn clarabel_par_by_env(p: &mut ClarabelParam) -> Result<(), QpError>
{
    set_by_env("CLARABEL", CLARABEL_KEYS, |k, v| set_clarabel_option(p, "clarabel", k, v))
}

/// Sets a [`ReductionParam`] from `QPSOCP_REDUCTION_EPS_ZERO`.
pub fn reduction_par_by_env(p: &mut ReductionParam) -> Result<(), QpError>
{
    set_by_env("QPSOCP", REDUCTION_KEYS, |k, v| set_reduction_option(p, "reduction", k, v).map(|_| ()))
}

//

#[test]
fn test_set_option()
{
    let mut p = TotsuParam::default();
    set_totsu_option(&mut p, "max_iter", "5000").unwrap();
    set_totsu_option(&mut p, "eps_acc", "1e-4").unwrap();
    assert_eq!(p.max_iter, Some(5000));
    assert_eq!(p.eps_acc, 1e-4);
    set_totsu_option(&mut p, "max_iter", "None").unwrap();
    assert_eq!(p.max_iter, None);

    let e = set_totsu_option(&mut p, "eps_acc", "tight").unwrap_err();
    assert!(matches!(e, QpError::InvalidOption {backend: "totsu", ..}));
    let e = set_totsu_option(&mut p, "feastol", "1e-4").unwrap_err();
    assert!(matches!(e, QpError::UnknownOption {backend: "totsu", ..}));

    let mut c = ClarabelParam::default();
    set_clarabel_option(&mut c, "clarabel", "verbose", "false").unwrap();
    set_clarabel_option(&mut c, "clarabel", "max_iter", "50").unwrap();
    assert!(!c.verbose);
    assert_eq!(c.max_iter, 50);
    assert!(set_clarabel_option(&mut c, "clarabel", "max_iter", "-1").is_err());

    let mut r = ReductionParam::default();
    assert_eq!(set_reduction_option(&mut r, "totsu", "reduction_eps_zero", "1e-6"), Ok(true));
    assert_eq!(r.eps_zero, 1e-6);
    assert_eq!(set_reduction_option(&mut r, "totsu", "eps_zero", "1e-6"), Ok(false));
}

#[test]
fn test_par_by_env()
{
    std::env::set_var("TOTSU_LOG_PERIOD", "123");
    std::env::set_var("QPSOCP_REDUCTION_EPS_ZERO", "1e-7");

    let mut p = TotsuParam::default();
    totsu_par_by_env(&mut p).unwrap();
    assert_eq!(p.log_period, 123);

    let mut r = ReductionParam::default();
    reduction_par_by_env(&mut r).unwrap();
    assert_eq!(r.eps_zero, 1e-7);

    std::env::set_var("CLARABEL_TIME_LIMIT", "forever");
    let mut c = ClarabelParam::default();
    assert!(clarabel_par_by_env(&mut c).is_err());
    std::env::remove_var("CLARABEL_TIME_LIMIT");
}
