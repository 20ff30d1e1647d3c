use regex::Regex;

use crate::model::Task;

/// Compile a case-insensitive search pattern. Invalid regex syntax falls back
/// to a literal match of the whole pattern.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Narrowing applied to a board's task list
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Matched against task name and description
    pub pattern: Option<Regex>,
    /// Tag name, compared case-insensitively
    pub tag: Option<String>,
}

impl TaskFilter {
    pub fn is_active(&self) -> bool {
        self.pattern.is_some() || self.tag.is_some()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(re) = &self.pattern
            && !re.is_match(&task.name)
            && !re.is_match(&task.description)
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !task.tags.iter().any(|t| t.name.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
