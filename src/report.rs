//! Outcomes of a solve

use core::fmt;

/// Outcome of a solve.
///
/// A vector is only carried by [`Solution::Optimal`]; every other outcome is a marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution<F>
{
    /// Optimal (or nearly optimal, see [`Notice::InaccurateSolution`]) \\(x\\).
    Optimal(Vec<F>),
    /// The constraints admit no point.
    Infeasible,
    /// The objective is unbounded below.
    Unbounded,
    /// The backend stopped without a conclusion, with its status.
    Failed(String),
}

impl<F> Solution<F>
{
    /// Returns the optimal vector if any.
    pub fn x(&self) -> Option<&[F]>
    {
        match self {
            Solution::Optimal(x) => Some(x),
            _ => None,
        }
    }

    /// Converts into the optimal vector if any.
    pub fn into_x(self) -> Option<Vec<F>>
    {
        match self {
            Solution::Optimal(x) => Some(x),
            _ => None,
        }
    }

    pub fn is_optimal(&self) -> bool
    {
        matches!(self, Solution::Optimal(_))
    }
}

impl<F> fmt::Display for Solution<F>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Solution::Optimal(x) => write!(f, "optimal ({} variables)", x.len()),
            Solution::Infeasible => write!(f, "infeasible"),
            Solution::Unbounded => write!(f, "unbounded"),
            Solution::Failed(status) => write!(f, "failed: {}", status),
        }
    }
}

/// Soft failure or condition worth reporting without failing the solve.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice
{
    /// The backend has no warm start; initial values were ignored.
    WarmStartIgnored,
    /// Infinite bounds produced no inequality row.
    InfiniteBoundsDropped {
        count: usize,
    },
    /// The backend reached a solution of reduced accuracy.
    InaccurateSolution {
        backend: &'static str,
        status: String,
    },
}

impl fmt::Display for Notice
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Notice::WarmStartIgnored =>
                write!(f, "warm-start values are ignored by this backend"),
            Notice::InfiniteBoundsDropped {count} =>
                write!(f, "{} infinite bounds dropped", count),
            Notice::InaccurateSolution {backend, status} =>
                write!(f, "{} returned {}: solution of reduced accuracy", backend, status),
        }
    }
}

/// Result of dispatching a QP to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport<F>
{
    /// Name of the backend that solved.
    pub backend: &'static str,
    pub solution: Solution<F>,
    pub notices: Vec<Notice>,
}

impl<F> SolveReport<F>
{
    pub(crate) fn new(backend: &'static str) -> Self
    {
        SolveReport {
            backend,
            solution: Solution::Failed("not solved".to_string()),
            notices: Vec::new(),
        }
    }

    /// Records a notice, also logging it.
    pub(crate) fn notice(&mut self, notice: Notice)
    {
        log::warn!("{}: {}", self.backend, notice);
        self.notices.push(notice);
    }
}

/// Per-solve options common to all backends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolveOptions
{
    /// Warm-start guess of \\(x\\), if any.
    pub initvals: Option<Vec<f64>>,
    /// Lets the backend print its progress.
    pub verbose: bool,
}

//

#[test]
fn test_report_notice()
{
    let mut r = SolveReport::<f64>::new("test");
    assert_eq!(r.solution.x(), None);

    r.notice(Notice::InfiniteBoundsDropped {count: 2});
    r.solution = Solution::Optimal(vec![1., 2.]);

    assert_eq!(r.notices, vec![Notice::InfiniteBoundsDropped {count: 2}]);
    assert_eq!(r.notices[0].to_string(), "2 infinite bounds dropped");
    assert_eq!(r.solution.into_x(), Some(vec![1., 2.]));
}

#[test]
fn test_solution_display()
{
    assert_eq!(Solution::Optimal(vec![0.; 3]).to_string(), "optimal (3 variables)");
    assert_eq!(Solution::<f64>::Infeasible.to_string(), "infeasible");
    assert_eq!(Solution::<f64>::Unbounded.to_string(), "unbounded");
    assert_eq!(Solution::<f64>::Failed("ExcessIter".to_string()).to_string(), "failed: ExcessIter");
}
