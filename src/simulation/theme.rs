//! Themes: named well layouts proposed from a text prompt
//!
//! A [`ThemeService`] turns a prompt into a [`ThemeResponse`] or fails.
//! Services may be slow, so [`ThemeRequest`] runs one on a worker thread and
//! hands the single result back over a `flume` channel. The frame loop polls
//! it and only ever sees three states: in flight, ready, failed.
//!
//! The simulation core never applies an unvalidated response: coordinates
//! must be normalized to `[0,1]`, masses positive, and the well count within
//! [`MIN_THEME_WELLS`]..=[`MAX_THEME_WELLS`].

use std::fmt;
use std::sync::Arc;
use std::thread;

use flume::{Receiver, TryRecvError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::states::{Color, GravityWell, Viewport};

pub const MIN_THEME_WELLS: usize = 2;
pub const MAX_THEME_WELLS: usize = 6;

/// One well in normalized viewport coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeWell {
    pub x: f64,
    pub y: f64,
    pub mass: f64,
    pub color: Color,
}

/// Wire shape of a generated theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResponse {
    pub theme_name: String,
    #[serde(default)]
    pub description: String,
    pub wells: Vec<ThemeWell>,
    pub background_style: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThemeError {
    /// The service has nothing for this prompt, or is not reachable
    Unavailable { prompt: String },
    /// The payload could not be parsed
    Malformed(String),
    /// The payload parsed but breaks a theme rule
    Invalid(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Unavailable { prompt } => write!(f, "no theme available for prompt '{}'", prompt),
            ThemeError::Malformed(msg) => write!(f, "malformed theme payload: {}", msg),
            ThemeError::Invalid(msg) => write!(f, "invalid theme: {}", msg),
        }
    }
}

impl std::error::Error for ThemeError {}

impl ThemeResponse {
    /// Parse the JSON payload a theme generator returns
    pub fn from_json(text: &str) -> Result<Self, ThemeError> {
        let theme: ThemeResponse =
            serde_json::from_str(text).map_err(|e| ThemeError::Malformed(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        let n = self.wells.len();
        if !(MIN_THEME_WELLS..=MAX_THEME_WELLS).contains(&n) {
            return Err(ThemeError::Invalid(format!(
                "'{}' has {} wells, expected {}..={}",
                self.theme_name, n, MIN_THEME_WELLS, MAX_THEME_WELLS
            )));
        }
        for (i, w) in self.wells.iter().enumerate() {
            if !(0.0..=1.0).contains(&w.x) || !(0.0..=1.0).contains(&w.y) {
                return Err(ThemeError::Invalid(format!(
                    "well {} at ({}, {}) is outside the unit square",
                    i, w.x, w.y
                )));
            }
            if !(w.mass > 0.0 && w.mass.is_finite()) {
                return Err(ThemeError::Invalid(format!("well {} has mass {}", i, w.mass)));
            }
        }
        Ok(())
    }

    /// Concrete wells for `viewport`, ids `ai-0`, `ai-1`, ...
    pub fn to_wells(&self, viewport: &Viewport) -> Result<Vec<GravityWell>, ThemeError> {
        self.validate()?;
        self.wells
            .iter()
            .enumerate()
            .map(|(i, w)| {
                GravityWell::new(format!("ai-{}", i), viewport.denormalize(w.x, w.y), w.mass, w.color.clone())
                    .map_err(|e| ThemeError::Invalid(e.to_string()))
            })
            .collect()
    }
}

/// Anything that can turn a prompt into a theme
pub trait ThemeService: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<ThemeResponse, ThemeError>;
}

/// Answers prompts from a list of themes, matched by name.
///
/// A prompt equal to a theme name (ignoring case and surrounding space) wins.
/// Otherwise the first theme whose name contains the prompt is used.
#[derive(Debug, Clone, Default)]
pub struct LibraryThemeService {
    themes: Vec<ThemeResponse>,
}

impl LibraryThemeService {
    pub fn new(themes: Vec<ThemeResponse>) -> Self {
        Self { themes }
    }

    pub fn push(&mut self, theme: ThemeResponse) {
        self.themes.push(theme);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.theme_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl ThemeService for LibraryThemeService {
    fn generate(&self, prompt: &str) -> Result<ThemeResponse, ThemeError> {
        let needle = prompt.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ThemeError::Unavailable { prompt: prompt.to_string() });
        }

        let exact = self
            .themes
            .iter()
            .find(|t| t.theme_name.trim().to_lowercase() == needle);
        let theme = exact
            .or_else(|| {
                self.themes
                    .iter()
                    .find(|t| t.theme_name.to_lowercase().contains(&needle))
            })
            .ok_or_else(|| ThemeError::Unavailable { prompt: prompt.to_string() })?;

        theme.validate()?;
        Ok(theme.clone())
    }
}

/// What the UI sees of a pending theme request
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeStatus {
    InFlight,
    Ready(ThemeResponse),
    Failed(ThemeError),
}

/// One-shot theme request running on a worker thread
pub struct ThemeRequest {
    prompt: String,
    rx: Receiver<Result<ThemeResponse, ThemeError>>,
    done: Option<ThemeStatus>,
}

impl ThemeRequest {
    pub fn spawn(service: Arc<dyn ThemeService>, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let (tx, rx) = flume::bounded(1);

        let worker_prompt = prompt.clone();
        thread::spawn(move || {
            let result = service.generate(&worker_prompt);
            // The requester may have given up, nothing to do then
            let _ = tx.send(result);
        });

        debug!("theme request for '{}' started", prompt);
        Self { prompt, rx, done: None }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Non-blocking check. Once a result arrives every later poll returns it
    pub fn poll(&mut self) -> ThemeStatus {
        if let Some(status) = &self.done {
            return status.clone();
        }

        let status = match self.rx.try_recv() {
            Ok(Ok(theme)) => ThemeStatus::Ready(theme),
            Ok(Err(e)) => ThemeStatus::Failed(e),
            Err(TryRecvError::Empty) => return ThemeStatus::InFlight,
            Err(TryRecvError::Disconnected) => {
                warn!("theme worker for '{}' exited without a result", self.prompt);
                ThemeStatus::Failed(ThemeError::Unavailable { prompt: self.prompt.clone() })
            }
        };
        self.done = Some(status.clone());
        status
    }

    /// Block until the worker finishes
    pub fn wait(mut self) -> ThemeStatus {
        if let Some(status) = self.done.take() {
            return status;
        }
        match self.rx.recv() {
            Ok(Ok(theme)) => ThemeStatus::Ready(theme),
            Ok(Err(e)) => ThemeStatus::Failed(e),
            Err(_) => ThemeStatus::Failed(ThemeError::Unavailable { prompt: self.prompt }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINARY: &str = r##"{
        "themeName": "Binary Star",
        "description": "two heavy suns",
        "wells": [
            {"x": 0.25, "y": 0.5, "mass": 3000, "color": "#06b6d4"},
            {"x": 0.75, "y": 0.5, "mass": 3000, "color": "#d946ef"}
        ],
        "backgroundStyle": "#000000"
    }"##;

    #[test]
    fn parses_wire_json() {
        let theme = ThemeResponse::from_json(BINARY).unwrap();
        assert_eq!(theme.theme_name, "Binary Star");
        assert_eq!(theme.wells.len(), 2);
    }

    #[test]
    fn rejects_garbage_and_bad_layouts() {
        assert!(matches!(ThemeResponse::from_json("not json"), Err(ThemeError::Malformed(_))));

        let mut theme = ThemeResponse::from_json(BINARY).unwrap();
        theme.wells.truncate(1);
        assert!(matches!(theme.validate(), Err(ThemeError::Invalid(_))));

        let mut theme = ThemeResponse::from_json(BINARY).unwrap();
        theme.wells[0].x = 1.5;
        assert!(theme.validate().is_err());

        let mut theme = ThemeResponse::from_json(BINARY).unwrap();
        theme.wells[1].mass = 0.0;
        assert!(theme.validate().is_err());
    }

    #[test]
    fn library_matches_case_insensitively() {
        let lib = LibraryThemeService::new(vec![ThemeResponse::from_json(BINARY).unwrap()]);
        assert!(lib.generate("binary").is_ok());
        assert!(matches!(lib.generate("chaos"), Err(ThemeError::Unavailable { .. })));
        assert!(lib.generate("   ").is_err());
    }

    #[test]
    fn library_prefers_an_exact_name_over_a_substring() {
        let mut chaos_theory = ThemeResponse::from_json(BINARY).unwrap();
        chaos_theory.theme_name = "Chaos Theory".to_string();
        let mut chaos = ThemeResponse::from_json(BINARY).unwrap();
        chaos.theme_name = "Chaos".to_string();

        let mut lib = LibraryThemeService::new(vec![chaos_theory]);
        lib.push(chaos);
        assert_eq!(lib.len(), 2);

        assert_eq!(lib.generate(" CHAOS ").unwrap().theme_name, "Chaos");
        assert_eq!(lib.generate("theory").unwrap().theme_name, "Chaos Theory");
        // no exact name, first substring hit
        assert_eq!(lib.generate("a").unwrap().theme_name, "Chaos Theory");
    }
}
