use anyhow::{bail, Context, Result};
use regex::Regex;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[derive(Debug)]
struct Group {
    name: String,
    regex: Regex,
}

/// Rules for reporting several item identifiers under one name.
#[derive(Debug, Default)]
pub struct Groups(Vec<Group>);

impl Groups {
    /// Reads group rules from `path`.
    ///
    /// The file consists of group specifications, one per line, in the
    /// following format:
    ///
    /// ```txt
    /// GROUP_NAME | GROUP_REGEX
    /// ```
    ///
    /// For example, with the rule `Widget | ^WID-` every item whose identifier
    /// starts with `WID-` is counted as a single item named `Widget`. Blank
    /// lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * The file cannot be opened or read
    /// * There is a line with an invalid format (no ` | ` separator)
    /// * `GROUP_REGEX` is an invalid regular expression
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        );
        let mut groups = Self::default();
        for line in file.lines() {
            let line = line.with_context(|| format!("reading {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let Some((name, regex_str)) = line.split_once(" | ") else {
                bail!(
                    "reading {}: bad line format (missing |): {line}",
                    path.display(),
                );
            };
            groups
                .add(name.trim(), regex_str.trim())
                .with_context(|| format!("reading {}", path.display()))?;
        }
        Ok(groups)
    }

    /// Adds a rule: items matching `regex_str` are reported as `name`.
    ///
    /// # Errors
    ///
    /// Returns any errors from compiling `regex_str` with [`Regex::new`].
    pub fn add(&mut self, name: &str, regex_str: &str) -> Result<()> {
        self.0.push(Group {
            name: name.to_string(),
            regex: Regex::new(regex_str)?,
        });
        Ok(())
    }

    /// Returns the name of the first group matching `item`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// # use monthly_sales::Groups;
    /// let mut groups = Groups::default();
    /// groups.add("Widget", "^WID-").unwrap();
    /// assert_eq!(groups.group_of("WID-RED"), Some("Widget"));
    /// assert_eq!(groups.group_of("GADGET"), None);
    /// ```
    #[must_use]
    pub fn group_of(&self, item: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|g| g.regex.is_match(item))
            .map(|g| g.name.as_str())
    }
}
