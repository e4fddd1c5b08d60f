use redis_record_adapter::{
    backend::{BackendError, MemoryBackend},
    commands::{CommandError, DispatchError},
    config::ConnectionConfig,
};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_set_and_get_round_trip() {
    let mut env = TestEnv::new();

    let values = vec!["mango", "", "line one\nline two\r\n", "ünïcödé", "  padded  "];

    for value in values {
        env.exec_command_success_response(
            TestUtils::set_command("grape", value),
            TestUtils::expected_ok(),
        )
        .await;

        env.exec_command_success_response(
            TestUtils::get_command("grape"),
            TestUtils::expected_bulk_string(value),
        )
        .await;
    }
}

#[tokio::test]
async fn test_get_missing_key() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::get_command("missing"),
        TestUtils::expected_null(),
    )
    .await;
}

#[tokio::test]
async fn test_get_list_is_wrong_type() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::rpush_command("fruits", &["mango"]),
        TestUtils::expected_integer(1),
    )
    .await;

    env.exec_command_error_response(TestUtils::get_command("fruits"), CommandError::WrongType)
        .await;
}

#[tokio::test]
async fn test_set_nx() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command_with_options("grape", "v1", &["NX"]),
        TestUtils::expected_ok(),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::set_command_with_options("grape", "v2", &["nx"]),
        TestUtils::expected_null(),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::get_command("grape"),
        TestUtils::expected_bulk_string("v1"),
    )
    .await;
}

#[tokio::test]
async fn test_set_xx() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command_with_options("missing", "v", &["XX"]),
        TestUtils::expected_null(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::exists_command(&["missing"]),
        TestUtils::expected_integer(0),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::set_command("grape", "v1"),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::set_command_with_options("grape", "v2", &["XX"]),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("grape"),
        TestUtils::expected_bulk_string("v2"),
    )
    .await;
}

#[tokio::test]
async fn test_set_with_expiration_options() {
    tokio::time::pause();
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command_with_options("grape", "mango", &["PX", "2500", "NX"]),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::pttl_command("grape"),
        TestUtils::expected_integer(3000),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::set_command_with_options("grape", "apple", &["EX", "60"]),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::ttl_command("grape"),
        TestUtils::expected_integer(60),
    )
    .await;

    // A plain SET drops the expiration
    env.exec_command_success_response(
        TestUtils::set_command("grape", "banana"),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::ttl_command("grape"),
        TestUtils::expected_integer(-1),
    )
    .await;
}

#[tokio::test]
async fn test_setex_and_psetex() {
    tokio::time::pause();
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::command("SETEX", &["grape", "10", "mango"]),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::ttl_command("grape"),
        TestUtils::expected_integer(10),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::command("PSETEX", &["apple", "500", "pear"]),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("apple"),
        TestUtils::expected_bulk_string("pear"),
    )
    .await;

    TestUtils::advance_ms(500).await;

    env.exec_command_success_response(
        TestUtils::get_command("apple"),
        TestUtils::expected_null(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("grape"),
        TestUtils::expected_bulk_string("mango"),
    )
    .await;
}

#[tokio::test]
async fn test_setnx_and_getset() {
    let mut env = TestEnv::new();

    let test_cases = vec![
        (
            TestUtils::command("SETNX", &["grape", "mango"]),
            TestUtils::expected_integer(1),
        ),
        (
            TestUtils::command("SETNX", &["grape", "apple"]),
            TestUtils::expected_integer(0),
        ),
        (
            TestUtils::command("GETSET", &["grape", "pear"]),
            TestUtils::expected_bulk_string("mango"),
        ),
        (
            TestUtils::get_command("grape"),
            TestUtils::expected_bulk_string("pear"),
        ),
        (
            TestUtils::command("GETSET", &["fresh", "kiwi"]),
            TestUtils::expected_null(),
        ),
        (
            TestUtils::get_command("fresh"),
            TestUtils::expected_bulk_string("kiwi"),
        ),
    ];

    for (command, expected) in test_cases {
        env.exec_command_success_response(command, expected).await;
    }
}

#[tokio::test]
async fn test_append_and_strlen() {
    let mut env = TestEnv::new();

    let test_cases = vec![
        (
            TestUtils::command("STRLEN", &["grape"]),
            TestUtils::expected_integer(0),
        ),
        (
            TestUtils::command("APPEND", &["grape", "man"]),
            TestUtils::expected_integer(3),
        ),
        (
            TestUtils::command("APPEND", &["grape", "go"]),
            TestUtils::expected_integer(5),
        ),
        (
            TestUtils::get_command("grape"),
            TestUtils::expected_bulk_string("mango"),
        ),
        (
            TestUtils::command("STRLEN", &["grape"]),
            TestUtils::expected_integer(5),
        ),
    ];

    for (command, expected) in test_cases {
        env.exec_command_success_response(command, expected).await;
    }
}

#[tokio::test]
async fn test_append_conflict_replies_zero() {
    let backend = MemoryBackend::new().conflicting_appends_to("grape");
    let mut env = TestEnv::with_backend(backend, ConnectionConfig::default());

    env.exec_command_success_response(
        TestUtils::set_command("grape", "man"),
        TestUtils::expected_ok(),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::command("APPEND", &["grape", "go"]),
        TestUtils::expected_integer(0),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("grape"),
        TestUtils::expected_bulk_string("man"),
    )
    .await;

    // Other keys append as usual
    env.exec_command_success_response(
        TestUtils::command("APPEND", &["kiwi", "go"]),
        TestUtils::expected_integer(2),
    )
    .await;
}

#[tokio::test]
async fn test_getrange() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command("letters", "abcde"),
        TestUtils::expected_ok(),
    )
    .await;

    let test_cases = vec![
        (vec!["letters", "1", "3"], "bcd"),
        (vec!["letters", "0", "-1"], "abcde"),
        (vec!["letters", "-3", "-2"], "cd"),
        (vec!["letters", "3", "100"], "de"),
        (vec!["letters", "4", "1"], ""),
        (vec!["missing", "0", "-1"], ""),
    ];

    for (arguments, expected) in test_cases {
        env.exec_command_success_response(
            TestUtils::command("GETRANGE", &arguments),
            TestUtils::expected_bulk_string(expected),
        )
        .await;
    }
}

#[tokio::test]
async fn test_setrange() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command("greeting", "Hello World"),
        TestUtils::expected_ok(),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::command("SETRANGE", &["greeting", "6", "Redis"]),
        TestUtils::expected_integer(11),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("greeting"),
        TestUtils::expected_bulk_string("Hello Redis"),
    )
    .await;

    env.exec_command_success_response(
        TestUtils::command("SETRANGE", &["padded", "3", "x"]),
        TestUtils::expected_integer(4),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("padded"),
        TestUtils::expected_bulk_string("\0\0\0x"),
    )
    .await;

    env.exec_command_error_response(
        TestUtils::command("SETRANGE", &["greeting", "-1", "x"]),
        CommandError::OffsetOutOfRange,
    )
    .await;
}

#[tokio::test]
async fn test_setrange_past_max_string_length() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command("grape", "mango"),
        TestUtils::expected_ok(),
    )
    .await;

    let test_cases = vec![
        vec!["grape", "9223372036854775807", "x"],
        vec!["grape", "536870912", "x"],
        vec!["grape", "536870911", "xy"],
        vec!["fresh", "9223372036854775807", "x"],
    ];

    for arguments in test_cases {
        env.exec_command_error_response(
            TestUtils::command("SETRANGE", &arguments),
            CommandError::StringTooLong,
        )
        .await;
    }

    // An empty value reports the current length without writing
    env.exec_command_success_response(
        TestUtils::command("SETRANGE", &["grape", "9223372036854775807", ""]),
        TestUtils::expected_integer(5),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::get_command("grape"),
        TestUtils::expected_bulk_string("mango"),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::exists_command(&["fresh"]),
        TestUtils::expected_integer(0),
    )
    .await;
}

#[tokio::test]
async fn test_incr_counts_from_zero() {
    let mut env = TestEnv::new();

    for expected in 1..=3 {
        env.exec_command_success_response(
            TestUtils::command("INCR", &["counter"]),
            TestUtils::expected_integer(expected),
        )
        .await;
    }

    env.exec_command_success_response(
        TestUtils::get_command("counter"),
        TestUtils::expected_bulk_string("3"),
    )
    .await;
}

#[tokio::test]
async fn test_incrby_decr_decrby() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command("counter", "10"),
        TestUtils::expected_ok(),
    )
    .await;

    let test_cases = vec![
        (TestUtils::command("INCRBY", &["counter", "5"]), 15),
        (TestUtils::command("DECR", &["counter"]), 14),
        (TestUtils::command("DECRBY", &["counter", "20"]), -6),
        (TestUtils::command("INCRBY", &["counter", "-4"]), -10),
        (TestUtils::command("DECRBY", &["fresh", "2"]), -2),
    ];

    for (command, expected) in test_cases {
        env.exec_command_success_response(command, TestUtils::expected_integer(expected))
            .await;
    }
}

#[tokio::test]
async fn test_incr_errors() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command("fruit", "mango"),
        TestUtils::expected_ok(),
    )
    .await;
    env.exec_command_success_response(
        TestUtils::set_command("big", &i64::MAX.to_string()),
        TestUtils::expected_ok(),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::command("INCR", &["fruit"]),
            CommandError::Backend(BackendError::Procedure(
                "ERR value is not an integer or out of range".to_string(),
            )),
        ),
        (
            TestUtils::command("INCR", &["big"]),
            CommandError::Backend(BackendError::Procedure(
                "ERR increment or decrement would overflow".to_string(),
            )),
        ),
        (
            TestUtils::command("INCRBY", &["counter", "1.5"]),
            CommandError::InvalidInteger,
        ),
        (
            TestUtils::command("DECRBY", &["counter", &i64::MIN.to_string()]),
            CommandError::InvalidInteger,
        ),
        (
            TestUtils::command("INCR", &[]),
            CommandError::WrongNumberOfArguments("incr".to_string()),
        ),
    ];

    for (command, expected) in test_cases {
        env.exec_command_error_response(command, expected).await;
    }
}

#[tokio::test]
async fn test_incrbyfloat() {
    let mut env = TestEnv::new();

    env.exec_command_success_response(
        TestUtils::set_command("price", "10.5"),
        TestUtils::expected_ok(),
    )
    .await;

    let test_cases = vec![
        (vec!["price", "0.1"], "10.6"),
        (vec!["price", "-5"], "5.6"),
        (vec!["sum", "0.1"], "0.1"),
        (vec!["sum", "0.2"], "0.3"),
        (vec!["fresh", "3.0"], "3"),
        (vec!["fresh", "2.5e1"], "28"),
    ];

    for (arguments, expected) in test_cases {
        env.exec_command_success_response(
            TestUtils::command("INCRBYFLOAT", &arguments),
            TestUtils::expected_bulk_string(expected),
        )
        .await;
    }

    env.exec_command_error_response(
        TestUtils::command("INCRBYFLOAT", &["price", "grape"]),
        CommandError::InvalidFloat,
    )
    .await;
}

#[tokio::test]
async fn test_set_rejects_invalid_options() {
    let mut env = TestEnv::new();

    let test_cases = vec![
        (
            TestUtils::set_command_with_options("grape", "mango", &["NX", "XX"]),
            CommandError::SyntaxError,
        ),
        (
            TestUtils::set_command_with_options("grape", "mango", &["EX", "0"]),
            CommandError::InvalidExpireTime("set".to_string()),
        ),
        (
            TestUtils::command("SETEX", &["grape", "-1", "mango"]),
            CommandError::InvalidExpireTime("setex".to_string()),
        ),
        (
            TestUtils::set_command_with_options("grape", "mango", &["EX", "9223372036854775807"]),
            CommandError::InvalidExpireTime("set".to_string()),
        ),
        (
            TestUtils::set_command_with_options("grape", "mango", &["PX", "9223372036854775807"]),
            CommandError::InvalidExpireTime("set".to_string()),
        ),
        (
            TestUtils::command("SETEX", &["grape", "9223372036854775807", "mango"]),
            CommandError::InvalidExpireTime("setex".to_string()),
        ),
        (
            TestUtils::command("PSETEX", &["grape", "0", "mango"]),
            CommandError::InvalidExpireTime("psetex".to_string()),
        ),
        (
            TestUtils::command("SET", &["grape"]),
            CommandError::WrongNumberOfArguments("set".to_string()),
        ),
    ];

    for (command, expected) in test_cases {
        env.exec_command_error_response(command, expected).await;
    }

    env.exec_command_success_response(
        TestUtils::exists_command(&["grape"]),
        TestUtils::expected_integer(0),
    )
    .await;
}

#[tokio::test]
async fn test_string_procedures_missing_from_store() {
    let backend = MemoryBackend::new().without_procedures();
    let mut env = TestEnv::with_backend(backend, Default::default());

    env.exec_command_error_response(
        TestUtils::command("INCR", &["counter"]),
        CommandError::MissingProcedure("redis.add".to_string()),
    )
    .await;

    // Native operations keep working
    env.exec_command_success_response(
        TestUtils::set_command("grape", "mango"),
        TestUtils::expected_ok(),
    )
    .await;

    let result = env
        .exec_command(TestUtils::command("STRLEN", &["grape"]))
        .await;
    assert_eq!(
        result,
        Err(DispatchError::Command(CommandError::MissingProcedure(
            "redis.strlen".to_string()
        )))
    );
}
