use crate::code::errors::{QueryCategory, QueryError};
use crate::selector::PseudoSpec;

/// Every pseudo-filter name a selector may use.
pub const PSEUDO_NAMES: &[&str] = &["first", "last", "eq", "gt", "lt", "even", "odd"];

/// A validated position-based refinement. Indices are 0-based.
///
/// Index arguments are signed: a negative or too large index is simply out
/// of range. `eq` then keeps nothing, `gt(-1)` keeps everything and
/// `lt(0)` keeps nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    First,
    Last,
    Eq(i64),
    Gt(i64),
    Lt(i64),
    Even,
    Odd,
}

impl Pseudo {
    pub fn from_spec(spec: &PseudoSpec) -> Result<Self, QueryError> {
        let pseudo = match spec.name.as_str() {
            "first" => Pseudo::First,
            "last" => Pseudo::Last,
            "even" => Pseudo::Even,
            "odd" => Pseudo::Odd,
            "eq" => Pseudo::Eq(index_arg(spec)?),
            "gt" => Pseudo::Gt(index_arg(spec)?),
            "lt" => Pseudo::Lt(index_arg(spec)?),
            other => {
                return Err(QueryError::unknown_name(
                    QueryCategory::Pseudo,
                    other,
                    PSEUDO_NAMES.iter().copied(),
                ))
            }
        };

        if !matches!(pseudo, Pseudo::Eq(_) | Pseudo::Gt(_) | Pseudo::Lt(_)) && spec.arg.is_some()
        {
            return Err(QueryError::InvalidPseudoArgument {
                pseudo: spec.name.clone(),
                argument: spec.arg.clone(),
                message: "takes no argument".to_string(),
            });
        }

        Ok(pseudo)
    }

    pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        match self {
            Pseudo::First => items.into_iter().take(1).collect(),
            Pseudo::Last => {
                let mut items = items;
                items.pop().into_iter().collect()
            }
            Pseudo::Eq(n) => match usize::try_from(n) {
                Ok(n) => items.into_iter().nth(n).into_iter().collect(),
                Err(_) => Vec::new(),
            },
            Pseudo::Gt(n) if n < 0 => items,
            Pseudo::Gt(n) => items.into_iter().skip(clamp_index(n).saturating_add(1)).collect(),
            Pseudo::Lt(n) if n <= 0 => Vec::new(),
            Pseudo::Lt(n) => items.into_iter().take(clamp_index(n)).collect(),
            Pseudo::Even => items.into_iter().step_by(2).collect(),
            Pseudo::Odd => items.into_iter().skip(1).step_by(2).collect(),
        }
    }
}

/// Non-negative index as `usize`, saturating where `usize` is narrower.
fn clamp_index(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

/// Integer argument; digits beyond `i64` saturate towards their sign.
fn index_arg(spec: &PseudoSpec) -> Result<i64, QueryError> {
    let invalid = |message: &str| QueryError::InvalidPseudoArgument {
        pseudo: spec.name.clone(),
        argument: spec.arg.clone(),
        message: message.to_string(),
    };

    let arg = spec
        .arg
        .as_deref()
        .ok_or_else(|| invalid("requires an index argument"))?;
    let arg = arg.trim();
    let (negative, digits) = match arg.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, arg),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("index must be an integer"));
    }

    Ok(arg.parse::<i64>().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Applies pseudo-filters left to right, each stage consuming the previous
/// stage's output. Never looks at the tree again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudoFilter {
    stages: Vec<Pseudo>,
}

impl PseudoFilter {
    pub fn new(specs: &[PseudoSpec]) -> Result<Self, QueryError> {
        let stages = specs
            .iter()
            .map(Pseudo::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stages })
    }

    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[Pseudo] {
        &self.stages
    }

    pub fn filter<T>(&self, items: Vec<T>) -> Vec<T> {
        self.stages
            .iter()
            .fold(items, |items, stage| stage.apply(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(specs: &[PseudoSpec], items: Vec<u32>) -> Vec<u32> {
        PseudoFilter::new(specs).unwrap().filter(items)
    }

    #[test]
    fn first_and_last() {
        assert_eq!(filter(&[PseudoSpec::new("first")], vec![4, 5, 6]), vec![4]);
        assert_eq!(filter(&[PseudoSpec::new("last")], vec![4, 5, 6]), vec![6]);
        assert_eq!(filter(&[PseudoSpec::new("last")], vec![]), Vec::<u32>::new());
    }

    #[test]
    fn eq_out_of_range_is_empty() {
        assert_eq!(filter(&[PseudoSpec::with_arg("eq", "1")], vec![4, 5, 6]), vec![5]);
        assert!(filter(&[PseudoSpec::with_arg("eq", "3")], vec![4, 5, 6]).is_empty());
    }

    #[test]
    fn negative_and_huge_indices_are_out_of_range() {
        let items = vec![4, 5, 6];
        assert!(filter(&[PseudoSpec::with_arg("eq", "-1")], items.clone()).is_empty());
        assert!(filter(
            &[PseudoSpec::with_arg("eq", "99999999999999999999999")],
            items.clone()
        )
        .is_empty());
        assert_eq!(
            PseudoFilter::new(&[PseudoSpec::with_arg("eq", "-99999999999999999999999")])
                .unwrap()
                .stages(),
            &[Pseudo::Eq(i64::MIN)]
        );

        assert_eq!(filter(&[PseudoSpec::with_arg("gt", "-1")], items.clone()), items);
        assert_eq!(filter(&[PseudoSpec::with_arg("gt", "-5")], items.clone()), items);
        assert!(filter(&[PseudoSpec::with_arg("gt", "99999999999999999999999")], items.clone())
            .is_empty());
        assert!(filter(&[PseudoSpec::with_arg("lt", "0")], items.clone()).is_empty());
        assert!(filter(&[PseudoSpec::with_arg("lt", "-3")], items.clone()).is_empty());
        assert_eq!(
            filter(&[PseudoSpec::with_arg("lt", "99999999999999999999999")], items.clone()),
            items
        );
    }

    #[test]
    fn gt_lt_even_odd() {
        let items = vec![0, 1, 2, 3, 4];
        assert_eq!(filter(&[PseudoSpec::with_arg("gt", "2")], items.clone()), vec![3, 4]);
        assert_eq!(filter(&[PseudoSpec::with_arg("lt", "2")], items.clone()), vec![0, 1]);
        assert_eq!(filter(&[PseudoSpec::new("even")], items.clone()), vec![0, 2, 4]);
        assert_eq!(filter(&[PseudoSpec::new("odd")], items), vec![1, 3]);
    }

    #[test]
    fn stages_apply_in_order() {
        let specs = [PseudoSpec::with_arg("gt", "0"), PseudoSpec::new("first")];
        assert_eq!(filter(&specs, vec![7, 8, 9]), vec![8]);

        let specs = [PseudoSpec::new("first"), PseudoSpec::with_arg("gt", "0")];
        assert!(filter(&specs, vec![7, 8, 9]).is_empty());
    }

    #[test]
    fn empty_spec_list_is_identity() {
        let pseudo = PseudoFilter::new(&[]).unwrap();
        assert!(pseudo.is_identity());
        assert_eq!(pseudo.filter(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn unknown_pseudo_fails_with_valid_names() {
        let err = PseudoFilter::new(&[PseudoSpec::new("second")]).unwrap_err();
        match err {
            QueryError::UnknownQueryName {
                category, valid, ..
            } => {
                assert_eq!(category, QueryCategory::Pseudo);
                assert_eq!(valid.len(), PSEUDO_NAMES.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_arguments_fail() {
        assert!(matches!(
            PseudoFilter::new(&[PseudoSpec::new("eq")]),
            Err(QueryError::InvalidPseudoArgument { .. })
        ));
        assert!(matches!(
            PseudoFilter::new(&[PseudoSpec::with_arg("eq", "one")]),
            Err(QueryError::InvalidPseudoArgument { .. })
        ));
        assert!(matches!(
            PseudoFilter::new(&[PseudoSpec::with_arg("lt", "-")]),
            Err(QueryError::InvalidPseudoArgument { .. })
        ));
        assert!(matches!(
            PseudoFilter::new(&[PseudoSpec::with_arg("first", "2")]),
            Err(QueryError::InvalidPseudoArgument { .. })
        ));
    }
}
