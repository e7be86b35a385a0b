//! Value codecs
//!
//! Stateless converters between raw MQTT payload strings and typed channel
//! values. A codec never touches the transport; it only answers "what does
//! this payload mean" and "what payload represents this value".

use serde::Serialize;

use crate::error::ValueError;

/// Action understood by an open/close/stop cover channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverAction {
    Open,
    Close,
    Stop,
}

/// A decoded channel value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChannelValue {
    OnOff(bool),
    Number(f64),
    /// Canonical 0..=100 percentage.
    Percent(f64),
    Text(String),
    Cover(CoverAction),
}

impl ChannelValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::OnOff(_) => "on_off",
            Self::Number(_) => "number",
            Self::Percent(_) => "percent",
            Self::Text(_) => "text",
            Self::Cover(_) => "cover",
        }
    }
}

/// Binary codec mapping two literals to true/false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnOffCodec {
    on: String,
    off: String,
}

impl OnOffCodec {
    pub fn new(on: impl Into<String>, off: impl Into<String>) -> Self {
        Self {
            on: on.into(),
            off: off.into(),
        }
    }

    pub fn on(&self) -> &str {
        &self.on
    }

    pub fn off(&self) -> &str {
        &self.off
    }

    fn decode(&self, payload: &str) -> Result<ChannelValue, ValueError> {
        if payload == self.on {
            Ok(ChannelValue::OnOff(true))
        } else if payload == self.off {
            Ok(ChannelValue::OnOff(false))
        } else {
            Err(ValueError::UnknownLiteral(payload.to_string()))
        }
    }

    fn encode(&self, value: &ChannelValue) -> Result<String, ValueError> {
        match value {
            ChannelValue::OnOff(true) => Ok(self.on.clone()),
            ChannelValue::OnOff(false) => Ok(self.off.clone()),
            other => Err(mismatch("on_off", other)),
        }
    }
}

impl Default for OnOffCodec {
    fn default() -> Self {
        Self::new("ON", "OFF")
    }
}

/// Decimal codec with optional bounds and step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberCodec {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
}

impl NumberCodec {
    /// Unbounded number.
    pub fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn bounded(min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Result<Self, ValueError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ValueError::InvalidBounds { min, max });
            }
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    fn check(&self, value: f64) -> Result<f64, ValueError> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if below || above {
            return Err(ValueError::OutOfRange {
                value,
                min: self.min.unwrap_or(f64::NEG_INFINITY),
                max: self.max.unwrap_or(f64::INFINITY),
            });
        }
        Ok(value)
    }

    fn decode(&self, payload: &str) -> Result<ChannelValue, ValueError> {
        let value = parse_decimal(payload)?;
        self.check(value).map(ChannelValue::Number)
    }

    fn encode(&self, value: &ChannelValue) -> Result<String, ValueError> {
        match value {
            ChannelValue::Number(v) | ChannelValue::Percent(v) => {
                self.check(*v).map(format_decimal)
            }
            other => Err(mismatch("number", other)),
        }
    }
}

/// Closed set of accepted text literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumerationCodec {
    literals: Vec<String>,
}

impl EnumerationCodec {
    /// Build from literals, dropping duplicates while keeping order.
    pub fn new<I, S>(literals: I) -> Result<Self, ValueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for literal in literals {
            let literal = literal.into();
            if !unique.contains(&literal) {
                unique.push(literal);
            }
        }
        if unique.is_empty() {
            return Err(ValueError::EmptyLiteralSet);
        }
        Ok(Self { literals: unique })
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.literals.iter().any(|l| l == literal)
    }

    fn decode(&self, payload: &str) -> Result<ChannelValue, ValueError> {
        if self.contains(payload) {
            Ok(ChannelValue::Text(payload.to_string()))
        } else {
            Err(ValueError::UnknownLiteral(payload.to_string()))
        }
    }

    fn encode(&self, value: &ChannelValue) -> Result<String, ValueError> {
        match value {
            ChannelValue::Text(text) if self.contains(text) => Ok(text.clone()),
            ChannelValue::Text(text) => Err(ValueError::UnknownLiteral(text.clone())),
            other => Err(mismatch("enumeration", other)),
        }
    }
}

/// Linear mapping of a source range onto 0..=100.
///
/// `low` maps to 0% and `high` to 100%; a reversed range (`low > high`) is
/// allowed. With `invert` set the result is mirrored (`100 - x`), which also
/// applies to the open/closed literal shortcuts. The shortcuts work in both
/// directions: fully open and fully closed encode to the literals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageCodec {
    low: f64,
    high: f64,
    invert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    closed_literal: Option<String>,
}

impl PercentageCodec {
    pub fn new(low: f64, high: f64) -> Result<Self, ValueError> {
        if low == high || !low.is_finite() || !high.is_finite() {
            return Err(ValueError::InvalidBounds {
                min: low,
                max: high,
            });
        }
        Ok(Self {
            low,
            high,
            invert: false,
            open_literal: None,
            closed_literal: None,
        })
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_literals(mut self, open: impl Into<String>, closed: impl Into<String>) -> Self {
        self.open_literal = Some(open.into());
        self.closed_literal = Some(closed.into());
        self
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    fn orient(&self, percent: f64) -> f64 {
        if self.invert {
            100.0 - percent
        } else {
            percent
        }
    }

    fn decode(&self, payload: &str) -> Result<ChannelValue, ValueError> {
        if self.open_literal.as_deref() == Some(payload) {
            return Ok(ChannelValue::Percent(self.orient(100.0)));
        }
        if self.closed_literal.as_deref() == Some(payload) {
            return Ok(ChannelValue::Percent(self.orient(0.0)));
        }

        let raw = parse_decimal(payload)?;
        let (min, max) = (self.low.min(self.high), self.low.max(self.high));
        if raw < min || raw > max {
            return Err(ValueError::OutOfRange {
                value: raw,
                min,
                max,
            });
        }
        let percent = (raw - self.low) * 100.0 / (self.high - self.low);
        Ok(ChannelValue::Percent(self.orient(percent)))
    }

    fn encode(&self, value: &ChannelValue) -> Result<String, ValueError> {
        let percent = match value {
            ChannelValue::Percent(p) | ChannelValue::Number(p) => *p,
            other => return Err(mismatch("percentage", other)),
        };
        if !(0.0..=100.0).contains(&percent) {
            return Err(ValueError::OutOfRange {
                value: percent,
                min: 0.0,
                max: 100.0,
            });
        }
        let oriented = self.orient(percent);
        let literal = match oriented {
            p if p == 100.0 => self.open_literal.as_ref(),
            p if p == 0.0 => self.closed_literal.as_ref(),
            _ => None,
        };
        if let Some(literal) = literal {
            return Ok(literal.clone());
        }

        let raw = self.low + oriented * (self.high - self.low) / 100.0;
        Ok(format_decimal(raw))
    }
}

/// Open/close/stop literals of a cover without position feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollershutterCodec {
    open: String,
    close: String,
    stop: String,
}

impl RollershutterCodec {
    pub fn new(open: impl Into<String>, close: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            stop: stop.into(),
        }
    }

    fn decode(&self, payload: &str) -> Result<ChannelValue, ValueError> {
        let action = if payload == self.open {
            CoverAction::Open
        } else if payload == self.close {
            CoverAction::Close
        } else if payload == self.stop {
            CoverAction::Stop
        } else {
            return Err(ValueError::UnknownLiteral(payload.to_string()));
        };
        Ok(ChannelValue::Cover(action))
    }

    fn encode(&self, value: &ChannelValue) -> Result<String, ValueError> {
        match value {
            ChannelValue::Cover(CoverAction::Open) => Ok(self.open.clone()),
            ChannelValue::Cover(CoverAction::Close) => Ok(self.close.clone()),
            ChannelValue::Cover(CoverAction::Stop) => Ok(self.stop.clone()),
            ChannelValue::Percent(p) if *p >= 100.0 => Ok(self.open.clone()),
            ChannelValue::Percent(p) if *p <= 0.0 => Ok(self.close.clone()),
            ChannelValue::Percent(p) => Err(ValueError::OutOfRange {
                value: *p,
                min: 0.0,
                max: 100.0,
            }),
            other => Err(mismatch("rollershutter", other)),
        }
    }
}

/// The codec bound to a channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueCodec {
    OnOff(OnOffCodec),
    Number(NumberCodec),
    Enumeration(EnumerationCodec),
    Percentage(PercentageCodec),
    /// Free text, any payload is accepted.
    Text,
    Rollershutter(RollershutterCodec),
}

impl ValueCodec {
    pub fn on_off(on: impl Into<String>, off: impl Into<String>) -> Self {
        Self::OnOff(OnOffCodec::new(on, off))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::OnOff(_) => "on_off",
            Self::Number(_) => "number",
            Self::Enumeration(_) => "enumeration",
            Self::Percentage(_) => "percentage",
            Self::Text => "text",
            Self::Rollershutter(_) => "rollershutter",
        }
    }

    /// Decode a raw payload into a channel value.
    pub fn decode(&self, payload: &str) -> Result<ChannelValue, ValueError> {
        match self {
            Self::OnOff(codec) => codec.decode(payload),
            Self::Number(codec) => codec.decode(payload),
            Self::Enumeration(codec) => codec.decode(payload),
            Self::Percentage(codec) => codec.decode(payload),
            Self::Text => Ok(ChannelValue::Text(payload.to_string())),
            Self::Rollershutter(codec) => codec.decode(payload),
        }
    }

    /// Encode a channel value into the payload to publish.
    pub fn encode(&self, value: &ChannelValue) -> Result<String, ValueError> {
        match self {
            Self::OnOff(codec) => codec.encode(value),
            Self::Number(codec) => codec.encode(value),
            Self::Enumeration(codec) => codec.encode(value),
            Self::Percentage(codec) => codec.encode(value),
            Self::Text => match value {
                ChannelValue::Text(text) => Ok(text.clone()),
                other => Err(mismatch("text", other)),
            },
            Self::Rollershutter(codec) => codec.encode(value),
        }
    }
}

fn mismatch(codec: &'static str, value: &ChannelValue) -> ValueError {
    ValueError::TypeMismatch {
        codec,
        actual: value.type_name(),
    }
}

fn parse_decimal(payload: &str) -> Result<f64, ValueError> {
    payload
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValueError::InvalidNumber(payload.to_string()))
}

/// Integral values are written without a fractional part.
fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        "0".to_string()
    } else {
        value.to_string()
    }
}
