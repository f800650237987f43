//! Texts sent to users.

use std::fmt::Write;

use cfbot_catalog::{Category, TaskSummary};

pub const GREETING: &str = "Hello";
pub const CANCELED: &str = "Canceled";
pub const COMMAND_NOT_FOUND: &str = "Command not found";
pub const NO_TASKS: &str = "There are no tasks in the database.";
pub const NO_TASKS_TRY_AGAIN: &str = "There are no tasks in the database. Try again";
pub const NO_CATEGORIES: &str = "There are no categories in the database.";
pub const INCORRECT_DIFFICULTY: &str =
    "An incorrect problem difficulty number was entered. Try again.";
pub const CATEGORY_NOT_FOUND: &str = "Category not found";

pub const HELP: &str = "Available commands:\n\
    /tasks - pick tasks by difficulty and category\n\
    /cancel - cancel the current selection\n\
    /help - show this message";

pub fn verification_code(code: &str) -> String {
    format!("Your verification code: {code}")
}

/// Numbered list, 1-based; the user answers with the number.
pub fn difficulty_prompt(difficulties: &[i64]) -> String {
    let mut text = String::from("Select the required difficulty of tasks from the list:");
    for (i, difficulty) in difficulties.iter().enumerate() {
        let _ = write!(text, "\n{}) {difficulty}", i + 1);
    }
    text
}

pub fn difficulty_set(difficulty: i64) -> String {
    format!("The task difficulty is set to {difficulty}.")
}

/// Categories labelled by ID; the user answers with the ID.
pub fn category_prompt(categories: &[Category]) -> String {
    let mut text = String::from("Select the required category of tasks from the list:");
    for category in categories {
        let _ = write!(text, "\n{}) {}", category.id, category.name);
    }
    text
}

pub fn task_list(difficulty: i64, category: &str, tasks: &[TaskSummary]) -> String {
    let mut text = format!(
        "The database contains the following problems with difficulty {difficulty} and the topic {category}:"
    );
    for task in tasks {
        let _ = write!(
            text,
            "\n№{}) {} number of solutions {}",
            task.number, task.name, task.solved_count
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_prompt_is_one_based() {
        assert_eq!(
            difficulty_prompt(&[800, 1200]),
            "Select the required difficulty of tasks from the list:\n1) 800\n2) 1200"
        );
    }

    #[test]
    fn category_prompt_uses_ids() {
        let categories = [
            Category {
                id: 3,
                name: "dp".into(),
            },
            Category {
                id: 7,
                name: "greedy".into(),
            },
        ];
        assert_eq!(
            category_prompt(&categories),
            "Select the required category of tasks from the list:\n3) dp\n7) greedy"
        );
    }

    #[test]
    fn task_list_lines() {
        let tasks = [TaskSummary {
            number: "4A".into(),
            name: "Watermelon".into(),
            solved_count: 412_000,
        }];
        assert_eq!(
            task_list(800, "math", &tasks),
            "The database contains the following problems with difficulty 800 and the topic \
             math:\n№4A) Watermelon number of solutions 412000"
        );
    }

    #[test]
    fn help_lists_commands() {
        assert!(HELP.contains("/tasks"));
        assert!(HELP.contains("/cancel"));
        assert!(!HELP.contains("  /"));
    }
}
