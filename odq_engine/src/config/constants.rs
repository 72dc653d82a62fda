pub mod compile_time {
    pub mod lexical {
        /// Maximum raw length of a single query-option value (64KB)
        /// SECURITY: Prevents DoS attacks via enormous option strings
        pub const MAX_OPTION_LENGTH: usize = 64 * 1024;

        /// Maximum number of tokens in a single expression
        /// SECURITY: Prevents DoS via token explosion attacks
        pub const MAX_TOKEN_COUNT: usize = 10_000;

        /// Maximum string literal size inside an expression (32KB)
        /// SECURITY: Prevents memory exhaustion via huge literals
        pub const MAX_STRING_SIZE: usize = 32 * 1024;

        /// Maximum identifier length for property and method names
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;
    }

    pub mod expression {
        /// Maximum expression nesting depth to prevent stack overflow
        /// SECURITY: Prevents DoS attacks via deeply nested expressions
        pub const MAX_EXPRESSION_DEPTH: usize = 64;

        /// Maximum number of order-by items per request
        /// RESOURCE: Bounds the per-request AST size
        pub const MAX_ORDERBY_ITEMS: usize = 32;
    }

    pub mod path {
        /// Maximum number of resource-path segments per request
        /// SECURITY: Prevents DoS via navigation-chain explosion
        pub const MAX_PATH_SEGMENTS: usize = 32;

        /// Maximum number of key properties in one key predicate
        /// RESOURCE: Bounds key-predicate parsing work
        pub const MAX_KEY_PREDICATES: usize = 16;
    }

    pub mod options {
        /// Maximum number of $expand items per request
        /// SECURITY: Prevents DoS via expand-tree explosion
        pub const MAX_EXPAND_ITEMS: usize = 64;

        /// Maximum number of $select items per request
        /// SECURITY: Prevents DoS via select-list explosion
        pub const MAX_SELECT_ITEMS: usize = 128;

        /// Maximum navigation depth for one $expand chain
        /// SECURITY: Prevents stack overflow in chain resolution
        pub const MAX_EXPAND_DEPTH: usize = 8;
    }

    pub mod logging {
        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;

        /// Log buffer size for memory loggers in tests
        /// RESOURCE: Controls memory usage for logging
        pub const LOG_BUFFER_SIZE: usize = 10_000;
    }
}
