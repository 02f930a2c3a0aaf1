//! Alert matching for incoming log lines
//!
//! Every datagram is matched against the configured action rules,
//! independently of the buffer pipeline. Matching is stateless: a line may
//! trigger zero, one, or many rules, and each match fires its own mail task.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, error};

use crate::config::{ActionKind, ActionRule};
use crate::mailer::Mailer;

struct CompiledRule {
    expression: Regex,
    rule: ActionRule,
}

/// Matches log lines against action rules and dispatches notifications
pub struct AlertMatcher {
    rules: Vec<CompiledRule>,
    mailer: Arc<dyn Mailer>,
}

impl AlertMatcher {
    /// Compile all rule expressions up front
    ///
    /// An invalid pattern is a configuration error and startup-fatal.
    pub fn new(actions: &[ActionRule], mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let rules = actions
            .iter()
            .map(|rule| {
                let expression = Regex::new(&rule.expression).map_err(|e| {
                    anyhow::anyhow!("invalid action expression `{}`: {e}", rule.expression)
                })?;
                Ok(CompiledRule {
                    expression,
                    rule: rule.clone(),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { rules, mailer })
    }

    /// Evaluate a line against all rules, firing one notification per match
    ///
    /// Mail sends are spawned as independent tasks so a slow or failing SMTP
    /// relay never delays the listener's receive loop. Send errors are logged
    /// and swallowed.
    pub fn evaluate(&self, line: &str) {
        if line.is_empty() {
            return;
        }

        for compiled in &self.rules {
            if !compiled.expression.is_match(line) {
                continue;
            }

            match compiled.rule.kind {
                ActionKind::Email => {
                    debug!(
                        "line matched `{}`, mailing {}",
                        compiled.rule.expression, compiled.rule.to
                    );

                    let mailer = Arc::clone(&self.mailer);
                    let to = compiled.rule.to.clone();
                    let subject = compiled.rule.subject.clone();
                    let body = line.to_string();

                    tokio::spawn(async move {
                        if let Err(e) = mailer.send(&to, &subject, &body).await {
                            error!("failed to send alert mail to {to}: {e}");
                        }
                    });
                }
                ActionKind::Unsupported => {
                    debug!(
                        "line matched `{}` but rule kind is unsupported, skipping",
                        compiled.rule.expression
                    );
                }
            }
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
