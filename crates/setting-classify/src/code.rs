//! Composite setting code parsing.
//!
//! A code is `category[_designation][_area]`. Designation and area are both
//! optional, so a two-segment code is only unambiguous when the set of area
//! tokens is disjoint from the designations. That is checked when the catalog
//! is validated, not here.
//!
//! The sentinels are always accepted as area tokens, because a split category
//! can carry `UKN` or `XxX` in its area slot. A designate-only category can
//! carry them in its designation slot instead, so when the parser knows the
//! category definitions it moves a trailing sentinel to the slot the category
//! actually has. Without definitions, a two-segment code ending in a
//! sentinel parses as an area.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use setting_model::{
    CategoryDefinition, ComponentCode, UNDETERMINABLE_CODE, UNKNOWN_CODE, compose_code,
};

use crate::error::CodeError;

/// Components recovered from a composite code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCode {
    pub category: ComponentCode,
    pub designation: Option<ComponentCode>,
    pub area: Option<ComponentCode>,
}

impl ParsedCode {
    pub fn compose(&self) -> String {
        compose_code([
            Some(self.category.as_str()),
            self.designation.as_ref().map(ComponentCode::as_str),
            self.area.as_ref().map(ComponentCode::as_str),
        ])
    }
}

/// Splits composite codes using the live set of area tokens.
#[derive(Debug, Clone)]
pub struct SettingCodeParser {
    pattern: Regex,
    area_tokens: Vec<String>,
    /// `(designate, split_area)` per known category.
    slots: BTreeMap<String, (bool, bool)>,
}

impl SettingCodeParser {
    /// Build the parser from area abbreviations.
    pub fn new<I, S>(area_tokens: I) -> Result<Self, CodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens: Vec<String> = area_tokens
            .into_iter()
            .map(|token| token.as_ref().trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();
        tokens.push(UNKNOWN_CODE.to_string());
        tokens.push(UNDETERMINABLE_CODE.to_string());
        // longest first keeps the alternation deterministic for shared prefixes
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();

        let alternation = tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        // The lazy designation group lets a trailing area token claim the
        // last segment first.
        let pattern = Regex::new(&format!(
            "^(?P<category>[^_]+)(?:_(?P<designation>[^_]+))??(?:_(?P<area>{alternation}))?$"
        ))?;
        Ok(Self {
            pattern,
            area_tokens: tokens,
            slots: BTreeMap::new(),
        })
    }

    /// Use category flags to place a trailing sentinel.
    pub fn with_categories<'c>(
        mut self,
        categories: impl IntoIterator<Item = &'c CategoryDefinition>,
    ) -> Self {
        self.slots = categories
            .into_iter()
            .map(|c| (c.abbreviation.clone(), (c.designate, c.split_area)))
            .collect();
        self
    }

    /// Area tokens the parser recognises, sentinels included.
    pub fn area_tokens(&self) -> &[String] {
        &self.area_tokens
    }

    pub fn parse(&self, code: &str) -> Result<ParsedCode, CodeError> {
        let code = code.trim();
        let captures = self
            .pattern
            .captures(code)
            .ok_or_else(|| CodeError::Malformed(code.to_string()))?;
        let component = |name: &str| {
            captures
                .name(name)
                .and_then(|m| ComponentCode::from_value(m.as_str()))
        };
        let category = component("category").ok_or_else(|| CodeError::Malformed(code.to_string()))?;
        let mut designation = component("designation");
        let mut area = component("area");
        if designation.is_none()
            && area.as_ref().is_some_and(ComponentCode::is_sentinel)
            && self.slots.get(category.as_str()) == Some(&(true, false))
        {
            designation = area.take();
        }
        Ok(ParsedCode {
            category,
            designation,
            area,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SettingCodeParser {
        SettingCodeParser::new(["InA", "OoA"]).unwrap()
    }

    fn resolved(value: &str) -> ComponentCode {
        ComponentCode::Resolved(value.to_string())
    }

    #[test]
    fn splits_all_three_components() {
        let parsed = parser().parse("SpMdA_SEMH_OoA").unwrap();
        assert_eq!(parsed.category, resolved("SpMdA"));
        assert_eq!(parsed.designation, Some(resolved("SEMH")));
        assert_eq!(parsed.area, Some(resolved("OoA")));
        assert_eq!(parsed.compose(), "SpMdA_SEMH_OoA");
    }

    #[test]
    fn trailing_segment_is_area_only_when_known() {
        let parser = parser();
        let area_only = parser.parse("IS_InA").unwrap();
        assert_eq!(area_only.designation, None);
        assert_eq!(area_only.area, Some(resolved("InA")));

        let designation_only = parser.parse("MmSU_ASD").unwrap();
        assert_eq!(designation_only.designation, Some(resolved("ASD")));
        assert_eq!(designation_only.area, None);

        let plain = parser.parse("MmS").unwrap();
        assert_eq!(plain.designation, None);
        assert_eq!(plain.area, None);
    }

    #[test]
    fn sentinels_parse_back_to_variants() {
        let parsed = parser().parse("SpMdA_XxX_UKN").unwrap();
        assert_eq!(parsed.designation, Some(ComponentCode::Undeterminable));
        assert_eq!(parsed.area, Some(ComponentCode::Unknown));

        let unknown = parser().parse("UKN").unwrap();
        assert_eq!(unknown.category, ComponentCode::Unknown);
    }

    #[test]
    fn two_segment_sentinel_is_read_as_area() {
        let parsed = parser().parse("MmSU_XxX").unwrap();
        assert_eq!(parsed.designation, None);
        assert_eq!(parsed.area, Some(ComponentCode::Undeterminable));
    }

    fn category(abbreviation: &str, designate: bool, split_area: bool) -> CategoryDefinition {
        CategoryDefinition {
            abbreviation: abbreviation.to_string(),
            order: 1,
            name: abbreviation.to_string(),
            label: abbreviation.to_string(),
            definition: String::new(),
            designate,
            split_area,
        }
    }

    #[test]
    fn category_flags_place_trailing_sentinel() {
        let categories = [
            category("MmSU", true, false),
            category("IS", false, true),
            category("SpMdA", true, true),
        ];
        let parser = parser().with_categories(&categories);

        let designate_only = parser.parse("MmSU_XxX").unwrap();
        assert_eq!(designate_only.designation, Some(ComponentCode::Undeterminable));
        assert_eq!(designate_only.area, None);
        assert_eq!(designate_only.compose(), "MmSU_XxX");

        let split_only = parser.parse("IS_UKN").unwrap();
        assert_eq!(split_only.designation, None);
        assert_eq!(split_only.area, Some(ComponentCode::Unknown));

        let both = parser.parse("SpMdA_SEMH_XxX").unwrap();
        assert_eq!(both.designation, Some(resolved("SEMH")));
        assert_eq!(both.area, Some(ComponentCode::Undeterminable));

        // a real area token is never moved
        let area = parser.parse("MmSU_InA").unwrap();
        assert_eq!(area.area, Some(resolved("InA")));
    }

    #[test]
    fn rejects_malformed_codes() {
        let parser = parser();
        for code in ["", "_InA", "SpMdA__InA", "SpMdA_SEMH_Elsewhere", "A_B_C_D"] {
            assert!(
                matches!(parser.parse(code), Err(CodeError::Malformed(_))),
                "expected {code:?} to be rejected"
            );
        }
    }

    #[test]
    fn area_tokens_are_escaped() {
        let parser = SettingCodeParser::new(["In.A"]).unwrap();
        assert!(parser.parse("IS_In.A").is_ok());
        assert!(parser.parse("IS_InxA").unwrap().area.is_none());
    }
}
