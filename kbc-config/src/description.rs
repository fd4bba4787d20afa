//! Line based keyboard controller description.
//!
//! ```text
//! # 3x2 test pad
//! row-pins = 0 1 2
//! col-pins = 16, 17
//! debounce-delay = 2
//! repeat-delay = 5
//! ghost-filter
//! wakeup-source
//! wakeup-key = wakeup
//! wake-keys = 0:0 2:1
//! fn-keymap = true
//!
//! key 0 0 = esc
//! key 2 1 = fn
//! fn  0 0 = 0x74
//! ```
//!
//! `#` starts a comment. Properties take the form `name = value`; flags may leave out the value.
//! Row and column pins are numbered in list order. A key code is either a mnemonic from
//! [`crate::keycodes`] or a number; mnemonics win, so single digit codes need the hex form.

use std::{collections::HashSet, ops::Range};

use kbc_common::{
    config::{ConfigError, KbcConfig},
    keycodes::{key_range, KEY_RESERVED},
    keymap::Layer,
    matrix::MAX_GPIO,
};
use log::{debug, warn};

use crate::{keycodes, DescriptionError};

type Span = Range<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Word<'s> {
    text: &'s str,
    span: Span,
}

/// Split `text` into words, tracking where each lies in the whole source.
fn words(text: &str, offset: usize, commas: bool) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices().chain([(text.len(), ' ')]) {
        if c.is_whitespace() || (commas && c == ',') {
            if let Some(s) = start.take() {
                out.push(Word {
                    text: &text[s..i],
                    span: offset + s..offset + i,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    out
}

fn extent(words: &[Word]) -> Span {
    match (words.first(), words.last()) {
        (Some(a), Some(b)) => a.span.start..b.span.end,
        _ => 0..0,
    }
}

fn number(word: &Word) -> Result<u32, DescriptionError> {
    let text = word.text;
    let n = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    n.map_err(|_| DescriptionError::new(format!("invalid number `{text}`"), word.span.clone()))
}

fn small_number(word: &Word) -> Result<u8, DescriptionError> {
    u8::try_from(number(word)?)
        .map_err(|_| DescriptionError::new(format!("`{}` is too large", word.text), word.span.clone()))
}

fn key_code(word: &Word) -> Result<u16, DescriptionError> {
    let code = match keycodes::key_code(word.text) {
        Some(code) => code,
        None if word.text.starts_with(|c: char| c.is_ascii_digit()) => {
            let n = number(word)?;
            u16::try_from(n).unwrap_or(u16::MAX)
        }
        None => {
            return Err(DescriptionError::new(
                format!("unknown key `{}`", word.text),
                word.span.clone(),
            ))
        }
    };
    if key_range::is_valid(code) {
        Ok(code)
    } else {
        Err(DescriptionError::config(
            ConfigError::InvalidKeyCode(code),
            word.span.clone(),
        ))
    }
}

#[derive(Default)]
struct Parser {
    config: KbcConfig,
    rows: Option<(Vec<u8>, Span)>,
    cols: Option<(Vec<u8>, Span)>,
    seen: HashSet<String>,
    fn_entry: Option<Span>,
}

/// Parse a description into a validated configuration.
pub fn parse(src: &str) -> Result<KbcConfig, DescriptionError> {
    let mut parser = Parser::default();
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let text = line.find('#').map_or(line, |i| &line[..i]);
        parser.line(text, offset)?;
        offset += line.len();
    }
    parser.finish()
}

impl Parser {
    fn line(&mut self, text: &str, offset: usize) -> Result<(), DescriptionError> {
        let (lhs, rhs) = match text.split_once('=') {
            Some((lhs, rhs)) => (lhs, Some((rhs, offset + lhs.len() + 1))),
            None => (text, None),
        };
        let names = words(lhs, offset, false);
        let Some(first) = names.first() else {
            return match rhs {
                Some(_) => Err(DescriptionError::new(
                    "missing property name",
                    offset..offset + text.trim_end().len(),
                )),
                None => Ok(()),
            };
        };

        match first.text {
            "key" => self.keymap_entry(Layer::Primary, &names, rhs),
            "fn" => self.keymap_entry(Layer::Alternate, &names, rhs),
            _ => {
                if let Some(extra) = names.get(1) {
                    return Err(DescriptionError::new(
                        format!("unexpected `{}`", extra.text),
                        extra.span.clone(),
                    ));
                }
                self.property(first, rhs)
            }
        }
    }

    fn keymap_entry(
        &mut self,
        layer: Layer,
        names: &[Word],
        rhs: Option<(&str, usize)>,
    ) -> Result<(), DescriptionError> {
        let [kind, row, col] = names else {
            return Err(DescriptionError::new(
                format!("expected `{} ROW COL = CODE`", names[0].text),
                extent(names),
            ));
        };
        let values = rhs.map(|(r, o)| words(r, o, false)).unwrap_or_default();
        let [code] = values.as_slice() else {
            return Err(DescriptionError::new(
                "expected a single key code",
                kind.span.start..extent(&values).end.max(col.span.end),
            ));
        };

        let span = row.span.start..col.span.end;
        let (r, c) = (small_number(row)?, small_number(col)?);
        let code = key_code(code)?;
        self.config
            .keymap
            .insert(layer, r, c, code)
            .map_err(|e| DescriptionError::config(e, span.clone()))?;
        if layer == Layer::Alternate && self.fn_entry.is_none() {
            self.fn_entry = Some(span);
        }
        Ok(())
    }

    fn property(
        &mut self,
        name: &Word,
        rhs: Option<(&str, usize)>,
    ) -> Result<(), DescriptionError> {
        if !self.seen.insert(name.text.to_string()) {
            return Err(DescriptionError::new(
                format!("duplicate property `{}`", name.text),
                name.span.clone(),
            ));
        }
        let values = rhs.map(|(r, o)| words(r, o, true)).unwrap_or_default();
        let span = name.span.start..extent(&values).end.max(name.span.end);

        let config = &mut self.config;
        match name.text {
            "debounce-delay" => config.debounce_cnt = number(single(name, &values)?)?,
            "repeat-delay" => config.repeat_cnt = number(single(name, &values)?)?,
            "scan-count" => config.scan_count = number(single(name, &values)?)?,
            "ghost-filter" => config.ghost_filter = flag(name, &values)?,
            "wakeup-source" => config.wake.enabled = flag(name, &values)?,
            "fn-keymap" => config.fn_keymap = flag(name, &values)?,
            "wakeup-key" => config.wake.wakeup_key = key_code(single(name, &values)?)?,
            "row-pins" => self.rows = Some((pins(&values)?, span)),
            "col-pins" => self.cols = Some((pins(&values)?, span)),
            "wake-keys" => {
                for word in &values {
                    let (row, col) = wake_key(word)?;
                    config
                        .wake
                        .add_key(row, col)
                        .map_err(|e| DescriptionError::config(e, word.span.clone()))?;
                }
            }
            _ => {
                return Err(DescriptionError::new(
                    format!("unknown property `{}`", name.text),
                    name.span.clone(),
                ))
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<KbcConfig, DescriptionError> {
        let (rows, rows_span) = self.rows.ok_or("missing `row-pins`")?;
        let (cols, cols_span) = self.cols.ok_or("missing `col-pins`")?;

        self.config.set_pins(&rows, &cols).map_err(|e| {
            let span = match e {
                ConfigError::MissingRowsOrColumns if rows.is_empty() => rows_span.clone(),
                ConfigError::MissingRowsOrColumns | ConfigError::TooManyPins { .. } => {
                    cols_span.clone()
                }
                _ => rows_span.start.min(cols_span.start)..rows_span.end.max(cols_span.end),
            };
            DescriptionError::config(e, span)
        })?;
        let rows = self.config.validate()?;

        if let Some(span) = self.fn_entry {
            if !self.config.fn_keymap {
                warn!("fn entries at {span:?} are unused without `fn-keymap`");
            }
        }
        let wake = &self.config.wake;
        if wake.wakeup_key != KEY_RESERVED && !wake.enabled {
            warn!("`wakeup-key` has no effect without `wakeup-source`");
        }
        debug!("{} rows, {} wake keys", rows, wake.keys.len());

        Ok(self.config)
    }
}

fn single<'a, 's>(name: &Word, values: &'a [Word<'s>]) -> Result<&'a Word<'s>, DescriptionError> {
    match values {
        [value] => Ok(value),
        _ => Err(DescriptionError::new(
            format!("`{}` takes a single value", name.text),
            name.span.start..extent(values).end.max(name.span.end),
        )),
    }
}

fn flag(name: &Word, values: &[Word]) -> Result<bool, DescriptionError> {
    match values {
        [] => Ok(true),
        [value] => match value.text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(DescriptionError::new(
                format!("`{}` expects true or false", name.text),
                value.span.clone(),
            )),
        },
        _ => Err(DescriptionError::new(
            format!("`{}` takes a single value", name.text),
            extent(values),
        )),
    }
}

fn pins(values: &[Word]) -> Result<Vec<u8>, DescriptionError> {
    values
        .iter()
        .map(|word| {
            let pin = small_number(word)?;
            if pin as usize >= MAX_GPIO {
                return Err(DescriptionError::config(
                    ConfigError::InvalidPin(pin),
                    word.span.clone(),
                ));
            }
            Ok(pin)
        })
        .collect()
}

fn wake_key(word: &Word) -> Result<(u8, u8), DescriptionError> {
    let err = || DescriptionError::new(format!("expected ROW:COL, got `{}`", word.text), word.span.clone());
    let (row, col) = word.text.split_once(':').ok_or_else(err)?;
    let row = row.parse().map_err(|_| err())?;
    let col = col.parse().map_err(|_| err())?;
    Ok((row, col))
}

#[cfg(test)]
#[path = "description_test.rs"]
mod test;
