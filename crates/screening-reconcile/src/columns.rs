use serde::{Deserialize, Serialize};

use crate::error::CorrectionError;

/// Locates a column by alias when the table's authoring is not
/// schema-controlled.
///
/// A header equal to an alias wins over one that merely contains it. Within
/// each kind of match aliases are tried in order, first header wins. All
/// comparisons ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnResolver {
    pub aliases: Vec<String>,
}

impl ColumnResolver {
    pub fn new(aliases: &[&str]) -> Self {
        Self {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        self.resolve_unclaimed(headers, &[])
    }

    /// Same as [`resolve`](Self::resolve), never returning a column listed in
    /// `claimed`.
    pub fn resolve_unclaimed(&self, headers: &[String], claimed: &[usize]) -> Option<usize> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let aliases: Vec<String> = self
            .aliases
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();

        let find = |matches: &dyn Fn(&str, &str) -> bool| {
            aliases.iter().find_map(|alias| {
                lowered
                    .iter()
                    .enumerate()
                    .find(|(i, header)| !claimed.contains(i) && matches(header, alias))
                    .map(|(i, _)| i)
            })
        };

        find(&|header, alias| header == alias).or_else(|| find(&|header, alias| header.contains(alias)))
    }
}

/// Aliases for the three columns of the correction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionColumns {
    pub name: ColumnResolver,
    pub date_of_birth: ColumnResolver,
    pub value: ColumnResolver,
}

impl Default for CorrectionColumns {
    fn default() -> Self {
        Self {
            name: ColumnResolver::new(&["піб", "пацієнт", "прізвище", "name"]),
            date_of_birth: ColumnResolver::new(&["дата народження", "народж", "dob", "birth"]),
            value: ColumnResolver::new(&["холестерин", "cholesterol", "non-hdl", "значення", "value"]),
        }
    }
}

/// Column indices of a correction table, one per role, all distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub name: usize,
    pub date_of_birth: usize,
    pub value: usize,
}

impl CorrectionColumns {
    /// Assign each role its own column.
    ///
    /// The date of birth is claimed first, then the value, then the name,
    /// whose aliases are the loosest ("пацієнт" also appears inside
    /// "Дата народження пацієнта").
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, CorrectionError> {
        let mut claimed = Vec::with_capacity(3);
        let mut claim = |resolver: &ColumnResolver, role: &'static str| {
            let index = resolver
                .resolve_unclaimed(headers, &claimed)
                .ok_or(CorrectionError::UnresolvedColumn { role })?;
            claimed.push(index);
            Ok::<_, CorrectionError>(index)
        };

        let date_of_birth = claim(&self.date_of_birth, "date of birth")?;
        let value = claim(&self.value, "value")?;
        let name = claim(&self.name, "name")?;
        Ok(ResolvedColumns {
            name,
            date_of_birth,
            value,
        })
    }
}
