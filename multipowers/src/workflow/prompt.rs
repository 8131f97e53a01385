//! Placeholder substitution for node prompt templates
//!
//! Four placeholders are recognised: `{task}`, `{workflow}`, `{node}` and `{role}`.
//! Substitution is a single left-to-right pass over the template, so placeholder
//! text that appears inside a substituted value is emitted literally.

const PLACEHOLDERS: [&str; 4] = ["{task}", "{workflow}", "{node}", "{role}"];

/// Render a prompt template. Unknown braces and absent placeholders pass through.
pub fn render(template: &str, task: &str, workflow: &str, node: &str, role: &str) -> String {
    let values = [task, workflow, node, role];
    let mut rendered = String::with_capacity(template.len() + task.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let candidate = &rest[open..];

        match PLACEHOLDERS
            .iter()
            .position(|placeholder| candidate.starts_with(placeholder))
        {
            Some(slot) => {
                rendered.push_str(values[slot]);
                rest = &candidate[PLACEHOLDERS[slot].len()..];
            }
            None => {
                rendered.push('{');
                rest = &candidate[1..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}
