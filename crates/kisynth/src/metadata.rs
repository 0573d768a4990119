//! Page setup and title block shared by boards and schematics.

use std::fmt;
use std::str::FromStr;

use kisynth_sexpr::{ListBuilder, Sexpr, kv};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Paper size written into the `paper` field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Paper {
    A5,
    #[default]
    A4,
    A3,
    A2,
    A1,
    A0,
    UsLetter,
    UsLegal,
    /// Custom page in millimetres.
    User { width: f64, height: f64 },
}

impl Paper {
    fn name(&self) -> &'static str {
        match self {
            Paper::A5 => "A5",
            Paper::A4 => "A4",
            Paper::A3 => "A3",
            Paper::A2 => "A2",
            Paper::A1 => "A1",
            Paper::A0 => "A0",
            Paper::UsLetter => "USLetter",
            Paper::UsLegal => "USLegal",
            Paper::User { .. } => "User",
        }
    }

    pub(crate) fn to_sexpr(self) -> Sexpr {
        let mut paper = ListBuilder::node("paper");
        paper.push(Sexpr::string(self.name()));
        if let Paper::User { width, height } = self {
            paper.push(width).push(height);
        }
        paper.build()
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paper::User { width, height } => write!(f, "User {width}x{height}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Paper {
    type Err = Error;

    /// Accepts the KiCad names and `User <w>x<h>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let paper = match s {
            "A5" => Paper::A5,
            "A4" => Paper::A4,
            "A3" => Paper::A3,
            "A2" => Paper::A2,
            "A1" => Paper::A1,
            "A0" => Paper::A0,
            "USLetter" => Paper::UsLetter,
            "USLegal" => Paper::UsLegal,
            _ => {
                let dims = s
                    .strip_prefix("User")
                    .map(str::trim)
                    .and_then(|rest| rest.split_once('x'))
                    .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)));
                match dims {
                    Some((width, height)) if width > 0.0 && height > 0.0 => {
                        Paper::User { width, height }
                    }
                    _ => return Err(Error::Config(format!("unknown paper size `{s}`"))),
                }
            }
        };
        Ok(paper)
    }
}

impl TryFrom<String> for Paper {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Paper> for String {
    fn from(paper: Paper) -> Self {
        paper.to_string()
    }
}

/// Date written into a title block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateStamp {
    /// Local date at render time.
    Today,
    Fixed(String),
    #[default]
    Omitted,
}

impl DateStamp {
    pub fn fixed(date: impl Into<String>) -> Self {
        DateStamp::Fixed(date.into())
    }

    pub fn resolve(&self) -> Option<String> {
        match self {
            DateStamp::Today => Some(chrono::Local::now().format("%Y-%m-%d").to_string()),
            DateStamp::Fixed(date) => Some(date.clone()),
            DateStamp::Omitted => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TitleBlock {
    pub title: String,
    pub date: DateStamp,
    pub revision: Option<String>,
    pub company: Option<String>,
    /// Up to nine free-form comment lines.
    pub comments: Vec<String>,
}

impl TitleBlock {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_sexpr(&self) -> Sexpr {
        let mut block = ListBuilder::node("title_block");
        block
            .push(kv("title", Sexpr::string(&self.title)))
            .push_opt(self.date.resolve().map(|d| kv("date", Sexpr::string(d))))
            .push_opt(self.revision.as_deref().map(|r| kv("rev", Sexpr::string(r))))
            .push_opt(self.company.as_deref().map(|c| kv("company", Sexpr::string(c))));
        for (idx, comment) in self.comments.iter().take(9).enumerate() {
            block.push(Sexpr::list(vec![
                Sexpr::symbol("comment"),
                Sexpr::int(idx as i64 + 1),
                Sexpr::string(comment),
            ]));
        }
        block.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kisynth_sexpr::formatter::{FormatMode, format_tree};

    #[test]
    fn paper_names_roundtrip() {
        for name in ["A4", "A3", "USLetter", "User 200x150"] {
            let paper: Paper = name.parse().unwrap();
            assert_eq!(paper.to_string(), name);
        }
        assert!("B5".parse::<Paper>().is_err());
        assert!("User 0x10".parse::<Paper>().is_err());
    }

    #[test]
    fn user_paper_carries_dimensions() {
        let paper = Paper::User {
            width: 200.0,
            height: 150.0,
        };
        assert_eq!(
            format_tree(&paper.to_sexpr(), FormatMode::Normal),
            "(paper \"User\" 200 150)\n"
        );
    }

    #[test]
    fn title_block_skips_missing_fields() {
        let mut block = TitleBlock::new("Buck");
        block.revision = Some("A".into());
        block.comments.push("generated".into());

        let text = format_tree(&block.to_sexpr(), FormatMode::Normal);
        assert_eq!(
            text,
            "(title_block\n\t(title \"Buck\")\n\t(rev \"A\")\n\t(comment 1 \"generated\")\n)\n"
        );
    }

    #[test]
    fn today_resolves_to_iso_date() {
        let date = DateStamp::Today.resolve().unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
    }
}
