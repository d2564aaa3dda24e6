//! CLI parsing tests for gather command using the test DSL.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    // =========================================================================
    // Macro-generated tests (standard patterns)
    // =========================================================================

    crate::cli_defaults_test! {
        command: "gather",
        variant: Gather,
        required_args: [],
        defaults: {
            server: None::<String>,
            database: None::<String>,
            measurement: None::<String>,
            query: None::<String>,
            tags: Vec::<String>::new(),
        },
    }

    crate::cli_option_test! {
        command: "gather",
        variant: Gather,
        test_name: test_with_server,
        args: ["--server", "user:pass@tcp(db:3306)/"],
        field: server,
        expected: Some("user:pass@tcp(db:3306)/".to_string()),
    }

    crate::cli_option_test! {
        command: "gather",
        variant: Gather,
        test_name: test_with_database,
        args: ["-d", "fakedatabase"],
        field: database,
        expected: Some("fakedatabase".to_string()),
    }

    crate::cli_option_test! {
        command: "gather",
        variant: Gather,
        test_name: test_with_measurement,
        args: ["--measurement", "custom"],
        field: measurement,
        expected: Some("custom".to_string()),
    }

    crate::cli_option_test! {
        command: "gather",
        variant: Gather,
        test_name: test_with_query,
        args: ["-q", "SELECT 1 AS up"],
        field: query,
        expected: Some("SELECT 1 AS up".to_string()),
    }

    crate::cli_option_test! {
        command: "gather",
        variant: Gather,
        test_name: test_with_repeated_tags,
        args: ["--tag", "host", "-t", "region"],
        field: tags,
        expected: vec!["host".to_string(), "region".to_string()],
    }

    crate::cli_error_test! {
        command: "gather",
        test_name: test_unknown_flag_rejected,
        args: ["--interval", "10s"],
    }

    crate::cli_error_test! {
        command: "gather",
        test_name: test_tag_requires_value,
        args: ["--tag"],
    }
}
