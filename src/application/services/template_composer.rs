//! Notification rendering.
//!
//! A document is rendered by a fixed sequence of named [`RenderStep`]s over an
//! accumulating [`RenderContext`]. Header, footer and slot render independently;
//! the layout step composes them and refuses to run while any of them is missing.
//! A failing step aborts the render and names itself in the error.

use askama::Template;
use std::fmt;

use crate::domain::entities::{BodyContent, NotificationDocument};
use crate::domain::errors::TemplateError;
use crate::domain::ports::NotificationRenderer;
use crate::utils::html::{escape_text, markdown_to_html, sanitize};

#[derive(Template)]
#[template(path = "email/header.html")]
struct HeaderTemplate<'a> {
    url: &'a str,
    title: &'a str,
}

#[derive(Template)]
#[template(path = "email/footer.html")]
struct FooterTemplate<'a> {
    text: &'a str,
}

#[derive(Template)]
#[template(path = "email/message.html")]
struct MessageTemplate<'a> {
    sender_name: &'a str,
    sender_email: &'a str,
    subject: &'a str,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "email/layout.html")]
struct LayoutTemplate<'a> {
    header: &'a str,
    slot: &'a str,
    footer: &'a str,
}

/// Whether user content is sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Delivery path. Submitted content passes through the allow-list sanitizer.
    Public,
    /// Trusted sample content only. Markdown is converted, nothing is sanitized.
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    Header,
    Footer,
    Slot,
    Layout,
}

impl RenderStep {
    pub const ORDER: [RenderStep; 4] = [Self::Header, Self::Footer, Self::Slot, Self::Layout];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Slot => "slot",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for RenderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outputs accumulated by the steps run so far.
#[derive(Debug, Default)]
pub struct RenderContext {
    header: Option<String>,
    footer: Option<String>,
    slot: Option<String>,
    document: Option<String>,
}

impl RenderContext {
    fn require<'a>(part: &'a Option<String>, name: &'static str) -> Result<&'a str, TemplateError> {
        part.as_deref().ok_or(TemplateError::MissingComponent(name))
    }
}

pub struct TemplateComposer {
    mode: RenderMode,
}

impl TemplateComposer {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    pub fn public() -> Self {
        Self::new(RenderMode::Public)
    }

    pub fn preview() -> Self {
        Self::new(RenderMode::Preview)
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Converts the slot body to markup, sanitizing it on the public path.
    fn content_html(&self, content: &BodyContent) -> String {
        let html = match content {
            BodyContent::Markup(raw) => raw.clone(),
            BodyContent::Markdown(raw) => markdown_to_html(raw),
        };

        match self.mode {
            RenderMode::Public => sanitize(&html),
            RenderMode::Preview => html,
        }
    }

    /// Runs one step, storing its output in `ctx`.
    pub fn run_step(
        &self,
        step: RenderStep,
        document: &NotificationDocument,
        ctx: &mut RenderContext,
    ) -> Result<(), TemplateError> {
        let failed = |e: askama::Error| TemplateError::Step {
            step: step.name(),
            message: e.to_string(),
        };

        match step {
            RenderStep::Header => {
                let html = HeaderTemplate {
                    url: &document.header.url,
                    title: &document.header.title,
                }
                .render()
                .map_err(failed)?;
                ctx.header = Some(html);
            }
            RenderStep::Footer => {
                let html = FooterTemplate {
                    text: &document.footer.text,
                }
                .render()
                .map_err(failed)?;
                ctx.footer = Some(html);
            }
            RenderStep::Slot => {
                let content = self.content_html(&document.slot.content);
                let html = MessageTemplate {
                    sender_name: &document.slot.sender_name,
                    sender_email: &document.slot.sender_email,
                    subject: &document.slot.subject,
                    content: &content,
                }
                .render()
                .map_err(failed)?;
                ctx.slot = Some(html);
            }
            RenderStep::Layout => {
                let html = LayoutTemplate {
                    header: RenderContext::require(&ctx.header, "header")?,
                    slot: RenderContext::require(&ctx.slot, "slot")?,
                    footer: RenderContext::require(&ctx.footer, "footer")?,
                }
                .render()
                .map_err(failed)?;
                ctx.document = Some(html);
            }
        }

        Ok(())
    }

    /// Renders the full document, or fails without partial output.
    pub fn compose(&self, document: &NotificationDocument) -> Result<String, TemplateError> {
        let mut ctx = RenderContext::default();
        for step in RenderStep::ORDER {
            self.run_step(step, document, &mut ctx)?;
        }
        ctx.document.ok_or(TemplateError::MissingComponent("layout"))
    }
}

impl NotificationRenderer for TemplateComposer {
    fn render(&self, document: &NotificationDocument) -> Result<String, TemplateError> {
        self.compose(document)
    }
}

/// Minimal hard-coded document substituted when rendering fails.
///
/// Every field is escaped; the body keeps its line breaks.
pub fn fallback_document(document: &NotificationDocument) -> String {
    let body = escape_text(document.slot.content.raw()).replace('\n', "<br>\n");

    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n\
         <h2>{title}</h2>\n\
         <p><strong>From:</strong> {name} &lt;{email}&gt;</p>\n\
         <p><strong>Subject:</strong> {subject}</p>\n\
         <hr>\n\
         <div>{body}</div>\n\
         <hr>\n\
         <p>{footer}</p>\n\
         </body>\n</html>\n",
        title = escape_text(&document.header.title),
        name = escape_text(&document.slot.sender_name),
        email = escape_text(&document.slot.sender_email),
        subject = escape_text(&document.slot.subject),
        body = body,
        footer = escape_text(&document.footer.text),
    )
}
