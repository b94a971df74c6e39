use crate::PreprocessError;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt, rest};
use nom::sequence::preceded;
use nom::IResult;
use shadercross_common::semantics::{RENDER_TARGET_SEMANTIC_COUNT, VERTEX_SEMANTICS};
use std::path::PathBuf;

/// A preprocessor definition, with an optional value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Define {
    pub name: String,
    pub value: Option<String>,
}

impl Define {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Define {
            name: name.into(),
            value,
        }
    }

    /// Parse a comma separated list of definitions, e.g. `DEBUG,SAMPLES=4`.
    ///
    /// Empty entries are skipped. Values extend to the next comma and are trimmed.
    pub fn parse_list(input: &str) -> Result<Vec<Define>, PreprocessError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                all_consuming(parse_define)(entry)
                    .map(|(_, define)| define)
                    .map_err(|_| PreprocessError::InvalidDefine(entry.to_string()))
            })
            .collect()
    }
}

fn parse_define(input: &str) -> IResult<&str, Define> {
    let (input, _) = multispace0(input)?;
    let (input, name) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = opt(preceded(char('='), rest))(input)?;

    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from);
    Ok((input, Define::new(name, value)))
}

/// Parse a `;` separated list of include directories.
///
/// Backslashes are normalized to forward slashes.
pub fn parse_include_dirs(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(|dir| PathBuf::from(dir.replace('\\', "/")))
        .collect()
}

/// The preamble every stage is compiled with.
///
/// The preamble maps every vertex semantic name to its attribute location so
/// that shaders can write `layout(location = TEXCOORD0)`, defines `SV_Target0`
/// through `SV_Target7`, and finally carries the user definitions.
#[derive(Debug, Clone)]
pub struct Preamble {
    defines: Vec<Define>,
}

impl Preamble {
    pub fn new(user_defines: &[Define]) -> Self {
        let mut defines: Vec<Define> = VERTEX_SEMANTICS
            .iter()
            .enumerate()
            .map(|(location, semantic)| Define::new(semantic.name, Some(location.to_string())))
            .collect();

        for target in 0..RENDER_TARGET_SEMANTIC_COUNT {
            defines.push(Define::new(
                format!("SV_Target{target}"),
                Some(target.to_string()),
            ));
        }

        defines.extend_from_slice(user_defines);
        Preamble { defines }
    }

    /// All definitions in the preamble, in declaration order.
    pub fn defines(&self) -> &[Define] {
        &self.defines
    }
}
