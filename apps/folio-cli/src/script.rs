use folio_input::{Direction, InputError, InputEvent};

/// Errors from parsing a simulation script.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptError {
    #[error("item '{0}' is not of the form FRAME:EVENT")]
    MissingFrame(String),
    #[error("bad frame number '{0}'")]
    BadFrame(String),
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    #[error("bad size '{0}', expected WIDTHxHEIGHT")]
    BadSize(String),
    #[error(transparent)]
    Direction(#[from] InputError),
}

/// One scripted event, delivered just before `frame` runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub frame: u64,
    pub event: InputEvent,
}

/// Parse `10:key=w,20:pointer=400x300,21:click`.
///
/// Steps come back ordered by frame; items on the same frame keep their
/// written order.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = text
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_item)
        .collect::<Result<Vec<_>, _>>()?;
    steps.sort_by_key(|s| s.frame);
    Ok(steps)
}

fn parse_item(item: &str) -> Result<ScriptStep, ScriptError> {
    let (frame, event) = item
        .split_once(':')
        .ok_or_else(|| ScriptError::MissingFrame(item.to_string()))?;
    let frame = frame
        .trim()
        .parse()
        .map_err(|_| ScriptError::BadFrame(frame.to_string()))?;
    Ok(ScriptStep {
        frame,
        event: parse_event(event.trim())?,
    })
}

fn parse_event(text: &str) -> Result<InputEvent, ScriptError> {
    if text == "click" {
        return Ok(InputEvent::Click);
    }
    let (kind, arg) = text
        .split_once('=')
        .ok_or_else(|| ScriptError::UnknownEvent(text.to_string()))?;
    match kind {
        "key" => Ok(InputEvent::KeyDown(arg.to_string())),
        "press" => Ok(InputEvent::ButtonPress(arg.parse::<Direction>()?)),
        "release" => Ok(InputEvent::ButtonRelease(arg.parse::<Direction>()?)),
        "pointer" => {
            let (x, y) = parse_size::<f32>(arg)?;
            Ok(InputEvent::PointerMove { x, y })
        }
        "resize" => {
            let (width, height) = parse_size::<u32>(arg)?;
            Ok(InputEvent::Resize { width, height })
        }
        _ => Err(ScriptError::UnknownEvent(text.to_string())),
    }
}

fn parse_size<T: std::str::FromStr>(text: &str) -> Result<(T, T), ScriptError> {
    let bad = || ScriptError::BadSize(text.to_string());
    let (a, b) = text.split_once('x').ok_or_else(bad)?;
    Ok((a.parse().map_err(|_| bad())?, b.parse().map_err(|_| bad())?))
}
