//! Online CKEditor: bold and underline formatting through keyboard shortcuts

use async_trait::async_trait;
use tracing::debug;

use crate::assertion::Matcher;
use crate::config::{Config, SessionConfig};
use crate::driver::{Key, KeyInput, KeySequence, Locator};
use crate::scenario::{Scenario, ScenarioContext};
use crate::steps::Interact;
use crate::Result;

pub const EDITOR_URL: &str = "https://onlinehtmleditor.dev";

pub const EDITABLE_CLASS: &str = "ck-editor__editable";

/// Types formatted text and checks the resulting markup
#[derive(Debug, Clone)]
pub struct RichTextEditorScenario {
    pub url: String,
}

impl Default for RichTextEditorScenario {
    fn default() -> Self {
        Self {
            url: EDITOR_URL.to_string(),
        }
    }
}

/// Ctrl+B, "Automation", Ctrl+B
fn bold_word() -> KeySequence {
    KeySequence::new()
        .then(KeyInput::chord(Key::Control, "b"))
        .then("Automation")
        .then(KeyInput::chord(Key::Control, "b"))
}

/// Space, Ctrl+U, "Test", Ctrl+U
fn underlined_word() -> KeySequence {
    KeySequence::new()
        .then(Key::Space)
        .then(KeyInput::chord(Key::Control, "u"))
        .then("Test")
        .then(KeyInput::chord(Key::Control, "u"))
}

fn plain_word() -> KeySequence {
    KeySequence::new().then(Key::Space).then("Example")
}

#[async_trait]
impl Scenario for RichTextEditorScenario {
    fn name(&self) -> &str {
        "rich_text_editor"
    }

    fn description(&self) -> &str {
        "Type bold, underlined and plain words into CKEditor"
    }

    fn session_config(&self, config: &Config) -> SessionConfig {
        config.browser_session(Some(&self.url))
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let editor = ctx.locate(Locator::class_name(EDITABLE_CLASS)).await?;

        for keys in [bold_word(), underlined_word(), plain_word()] {
            ctx.run(Interact::type_keys(editor.clone(), keys)).await?;
        }

        let html = ctx
            .run(Interact::read_attribute(editor, "innerHTML"))
            .await?
            .unwrap_or_default();
        debug!("Editor innerHTML: {}", html);

        ctx.expect(
            "bold 'Automation'",
            html.as_str(),
            Matcher::contains("<strong>Automation</strong>"),
        )?;
        ctx.expect(
            "underlined 'Test'",
            html.as_str(),
            Matcher::contains("<u>Test</u>"),
        )?;
        ctx.expect("plain 'Example'", html, Matcher::contains("Example"))
    }
}
