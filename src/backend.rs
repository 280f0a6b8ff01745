//! Solver backends and their dispatch

use std::collections::BTreeMap;
use crate::{ProbQP, ConeProgram, QpError, SolveOptions, SolveReport, Notice};

mod param;
mod totsu;
mod clarabel;

pub use param::*;
pub use self::totsu::*;
pub use self::clarabel::*;

//

/// Problem form a backend consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability
{
    /// Second-order cone programs; QPs reach it through [`ProbQP::to_socp`].
    ConeProgram,
    /// Quadratic programs as they are, with bounds folded into inequalities.
    Qp,
}

/// Solver backend trait
///
/// A backend translates a [`ProbQP`] into the call of its external solver,
/// invokes it once and interprets its status as a [`crate::Solution`].
pub trait QpBackend
{
    /// Name under which the backend is registered.
    fn name(&self) -> &'static str;

    fn capability(&self) -> Capability;

    /// Sets an option by a string key/value pair.
    ///
    /// Returns `Ok`, or [`QpError::UnknownOption`]/[`QpError::InvalidOption`].
    fn set_option(&mut self, key: &str, value: &str) -> Result<(), QpError>;

    /// Solves a QP.
    ///
    /// Returns the [`SolveReport`], or `Err` if the problem is malformed.
    /// Infeasibility, unboundedness and solver failures are reported as outcomes in the report.
    fn solve(&self, qp: &ProbQP<f64>, opts: &SolveOptions) -> Result<SolveReport<f64>, QpError>;
}

//

/// Backends keyed by name
///
/// Passed explicitly to where a QP is dispatched; there is no global registry.
pub struct Registry
{
    backends: BTreeMap<&'static str, Box<dyn QpBackend + Send + Sync>>,
}

impl Registry
{
    /// Creates an empty registry.
    pub fn new() -> Self
    {
        Registry {
            backends: BTreeMap::new(),
        }
    }

    /// Creates a registry of `totsu`, `clarabel` and `clarabel_qp` with their default parameters.
    pub fn with_defaults() -> Self
    {
        let mut r = Registry::new();
        r.register(TotsuBackend::new());
        r.register(ClarabelBackend::conic());
        r.register(ClarabelBackend::direct());
        r
    }

    /// Registers a backend under its name.
    ///
    /// Returns the backend previously registered under the same name, if any.
    pub fn register<B>(&mut self, backend: B) -> Option<Box<dyn QpBackend + Send + Sync>>
    where B: QpBackend + Send + Sync + 'static
    {
        self.backends.insert(backend.name(), Box::new(backend))
    }

    /// Names of the registered backends in ascending order.
    pub fn names(&self) -> Vec<&'static str>
    {
        self.backends.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Result<&(dyn QpBackend + Send + Sync), QpError>
    {
        self.backends.get(name)
            .map(|b| &**b)
            .ok_or_else(|| QpError::UnknownBackend(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut (dyn QpBackend + Send + Sync), QpError>
    {
        match self.backends.get_mut(name) {
            Some(b) => Ok(&mut **b),
            None => Err(QpError::UnknownBackend(name.to_string())),
        }
    }

    /// Sets an option of a backend by a string key/value pair.
    pub fn set_option(&mut self, name: &str, key: &str, value: &str) -> Result<(), QpError>
    {
        self.get_mut(name)?.set_option(key, value)
    }

    /// Solves a QP with the backend of `name`.
    ///
    /// Returns the [`SolveReport`], or [`QpError::UnknownBackend`] or any error of [`QpBackend::solve`].
    pub fn solve(&self, name: &str, qp: &ProbQP<f64>, opts: &SolveOptions) -> Result<SolveReport<f64>, QpError>
    {
        let backend = self.get(name)?;
        log::info!("solving QP of {} variables with {}", qp.n(), backend.name());

        let report = backend.solve(qp, opts)?;
        log::info!("{}: {}", report.backend, report.solution);
        Ok(report)
    }
}

impl Default for Registry
{
    fn default() -> Self
    {
        Self::with_defaults()
    }
}

//

/// Starts a report, noting ignored initial values.
fn start_report(backend: &'static str, opts: &SolveOptions) -> SolveReport<f64>
{
    let mut report = SolveReport::new(backend);
    if opts.initvals.is_some() {
        report.notice(Notice::WarmStartIgnored);
    }
    report
}

/// Reduces a QP for a cone program backend, noting dropped bounds.
fn reduce(qp: &ProbQP<f64>, red: &ReductionParam, report: &mut SolveReport<f64>) -> Result<ConeProgram<f64>, QpError>
{
    let (cp, dropped) = qp.to_socp(red.eps_zero)?;
    if dropped > 0 {
        report.notice(Notice::InfiniteBoundsDropped {count: dropped});
    }
    Ok(cp)
}

//

#[test]
fn test_registry()
{
    let mut r = Registry::with_defaults();
    assert_eq!(r.names(), vec!["clarabel", "clarabel_qp", "totsu"]);
    assert_eq!(r.get("clarabel_qp").map(|b| b.capability()), Ok(Capability::Qp));
    assert_eq!(r.get("totsu").map(|b| b.capability()), Ok(Capability::ConeProgram));

    assert!(matches!(r.get("ecos"), Err(QpError::UnknownBackend(_))));
    assert!(matches!(r.set_option("totsu", "abstol", "1"), Err(QpError::UnknownOption {backend: "totsu", ..})));
    assert!(r.set_option("totsu", "max_iter", "1000").is_ok());

    let prev = r.register(TotsuBackend::new());
    assert!(prev.is_some());
    assert_eq!(r.names().len(), 3);
}
