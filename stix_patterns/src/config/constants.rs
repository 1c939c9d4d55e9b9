pub mod compile_time {
    pub mod lexical {
        /// Maximum pattern length accepted for validation (64KB)
        /// SECURITY: Prevents DoS attacks via enormous pattern strings
        pub const MAX_PATTERN_LENGTH: usize = 65_536;

        /// Maximum string literal size, including quotes
        /// SECURITY: Bounds per-literal memory
        pub const MAX_STRING_SIZE: usize = 16_384;

        /// Maximum identifier length (255 characters)
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;

        /// Maximum number of tokens allowed in a single pattern
        /// SECURITY: Prevents DoS via token explosion attacks
        pub const MAX_TOKEN_COUNT: usize = 10_000;
    }

    pub mod syntax {
        /// Maximum nesting of brackets and parentheses
        /// SECURITY: Prevents stack overflow via deeply nested expressions
        pub const MAX_PARSE_DEPTH: usize = 64;

        /// Maximum elements in a parenthesized literal list
        /// RESOURCE: Bounds list validation work
        pub const MAX_LIST_ELEMENTS: usize = 1_000;
    }

    pub mod semantic {
        /// Maximum diagnostics collected in one semantic pass
        /// SECURITY: Prevents unbounded error accumulation
        pub const MAX_SEMANTIC_ERRORS: usize = 1_000;

        /// Maximum length of a single diagnostic message
        /// RESOURCE: Echoed literals are truncated beyond this
        pub const MAX_ERROR_MESSAGE_LENGTH: usize = 1_000;
    }

    pub mod logging {
        /// Events retained by the in-memory logger
        /// RESOURCE: Controls memory usage for event capture
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum length of a logged message
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 4_096;
    }
}
