use std::fmt;

use crate::chem::elements::is_element;
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Composition – parsed element amounts
// ---------------------------------------------------------------------------

/// Element amounts of a formula, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    amounts: Vec<(String, f64)>,
}

impl Composition {
    /// Element symbols with a positive amount.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts
            .iter()
            .filter(|(_, amt)| *amt > 0.0)
            .map(|(sym, _)| sym.as_str())
    }

    pub fn amount(&self, symbol: &str) -> f64 {
        self.amounts
            .iter()
            .find(|(sym, _)| sym == symbol)
            .map(|(_, amt)| *amt)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.amount(symbol) > 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.elements().next().is_none()
    }

    fn add(&mut self, symbol: &str, amount: f64) {
        match self.amounts.iter_mut().find(|(sym, _)| sym == symbol) {
            Some((_, amt)) => *amt += amount,
            None => self.amounts.push((symbol.to_string(), amount)),
        }
    }

    fn merge(&mut self, other: Composition, factor: f64) {
        for (sym, amt) in other.amounts {
            self.add(&sym, amt * factor);
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (sym, amt) in self.amounts.iter().filter(|(_, amt)| *amt > 0.0) {
            if (amt - 1.0).abs() < 1e-8 {
                write!(f, "{sym}")?;
            } else {
                write!(f, "{sym}{amt}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a chemical formula into its element amounts.
///
/// Accepted forms:
/// * element symbols with optional decimal amounts: `Fe2O3`, `Li0.5CoO2`
/// * nested groups with multipliers: `Ca3(PO4)2`, `K4[Fe(CN)6]`
/// * adducts / hydrates joined by `·`, `*` or `.`: `CuSO4·5H2O`, `CaO.SiO2`
///
/// A `.` directly between digits is a decimal point, not a separator.
pub fn parse_formula(formula: &str) -> Result<Composition, ParseError> {
    let trimmed = formula.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser {
        formula: trimmed,
        chars: trimmed.chars().collect(),
        pos: 0,
    };
    let composition = parser.adducts()?;
    if composition.is_empty() {
        return Err(ParseError::NoElements(trimmed.to_string()));
    }
    Ok(composition)
}

struct Parser<'a> {
    formula: &'a str,
    chars: Vec<char>,
    pos: usize,
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | '·' | '*')
}

fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// `part (sep coefficient? part)*`
    fn adducts(&mut self) -> Result<Composition, ParseError> {
        let mut total = Composition::default();
        loop {
            self.skip_whitespace();
            let factor = self.amount()?.unwrap_or(1.0);
            let part = self.sequence(None)?;
            total.merge(part, factor);
            match self.peek() {
                None => return Ok(total),
                Some(c) if is_separator(c) => self.pos += 1,
                Some(c) => return Err(self.unexpected(c)),
            }
        }
    }

    /// Elements and groups up to `close` (or end of input / separator at top level).
    fn sequence(&mut self, close: Option<char>) -> Result<Composition, ParseError> {
        let mut comp = Composition::default();
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return match close {
                    Some(_) => Err(ParseError::Unbalanced(self.formula.to_string())),
                    None => Ok(comp),
                };
            };

            if Some(c) == close {
                self.pos += 1;
                return Ok(comp);
            }
            match c {
                '(' | '[' | '{' => {
                    self.pos += 1;
                    let inner = self.sequence(Some(closing(c)))?;
                    let factor = self.amount()?.unwrap_or(1.0);
                    comp.merge(inner, factor);
                }
                ')' | ']' | '}' => {
                    return Err(ParseError::Unbalanced(self.formula.to_string()));
                }
                c if close.is_none() && is_separator(c) => return Ok(comp),
                c if c.is_ascii_uppercase() => {
                    let symbol = self.symbol();
                    if !is_element(&symbol) {
                        return Err(ParseError::UnknownElement {
                            formula: self.formula.to_string(),
                            symbol,
                        });
                    }
                    let amount = self.amount()?.unwrap_or(1.0);
                    comp.add(&symbol, amount);
                }
                c => return Err(self.unexpected(c)),
            }
        }
    }

    fn symbol(&mut self) -> String {
        let mut symbol = String::new();
        symbol.push(self.chars[self.pos]);
        self.pos += 1;
        while let Some(c) = self.peek().filter(char::is_ascii_lowercase) {
            symbol.push(c);
            self.pos += 1;
        }
        symbol
    }

    /// Optional `digits ('.' digits)?`.
    fn amount(&mut self) -> Result<Option<f64>, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(None);
        }
        if self.peek() == Some('.')
            && self
                .chars
                .get(self.pos + 1)
                .is_some_and(|c| c.is_ascii_digit())
        {
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| ParseError::InvalidAmount {
                formula: self.formula.to_string(),
                amount: text,
            })
    }

    fn unexpected(&self, ch: char) -> ParseError {
        ParseError::UnexpectedChar {
            formula: self.formula.to_string(),
            ch,
            pos: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(formula: &str) -> Vec<String> {
        parse_formula(formula)
            .unwrap()
            .elements()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_simple_formula() {
        let comp = parse_formula("Fe2O3").unwrap();
        assert_eq!(comp.amount("Fe"), 2.0);
        assert_eq!(comp.amount("O"), 3.0);
        assert_eq!(symbols("Fe2O3"), vec!["Fe", "O"]);
    }

    #[test]
    fn test_groups_and_multipliers() {
        let comp = parse_formula("Ca3(PO4)2").unwrap();
        assert_eq!(comp.amount("Ca"), 3.0);
        assert_eq!(comp.amount("P"), 2.0);
        assert_eq!(comp.amount("O"), 8.0);

        let comp = parse_formula("K4[Fe(CN)6]").unwrap();
        assert_eq!(comp.amount("C"), 6.0);
        assert_eq!(comp.amount("N"), 6.0);
        assert_eq!(comp.amount("Fe"), 1.0);
    }

    #[test]
    fn test_fractional_amounts() {
        let comp = parse_formula("Li0.5CoO2").unwrap();
        assert_eq!(comp.amount("Li"), 0.5);
        assert_eq!(comp.to_string(), "Li0.5CoO2");
    }

    #[test]
    fn test_hydrates() {
        let comp = parse_formula("CuSO4·5H2O").unwrap();
        assert_eq!(comp.amount("H"), 10.0);
        assert_eq!(comp.amount("O"), 9.0);

        let comp = parse_formula("CaO.SiO2").unwrap();
        assert_eq!(comp.amount("O"), 3.0);
        assert_eq!(comp.amount("Si"), 1.0);
    }

    #[test]
    fn test_repeated_elements_merge() {
        let comp = parse_formula("HCOOH").unwrap();
        assert_eq!(comp.amount("H"), 2.0);
        assert_eq!(comp.amount("O"), 2.0);
        assert_eq!(symbols("HCOOH"), vec!["H", "C", "O"]);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(symbols("  Mg O "), vec!["Mg", "O"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_formula("   "), Err(ParseError::Empty));
        assert!(matches!(
            parse_formula("Xx2O"),
            Err(ParseError::UnknownElement { symbol, .. }) if symbol == "Xx"
        ));
        assert!(matches!(
            parse_formula("Fe2O3)"),
            Err(ParseError::Unbalanced(_))
        ));
        assert!(matches!(
            parse_formula("Ca3(PO4"),
            Err(ParseError::Unbalanced(_))
        ));
        assert!(matches!(
            parse_formula("fe2o3"),
            Err(ParseError::UnexpectedChar { ch: 'f', pos: 0, .. })
        ));
        assert!(matches!(parse_formula("Fe0"), Err(ParseError::NoElements(_))));
    }
}
