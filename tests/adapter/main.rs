mod commands;
mod test_utils;
