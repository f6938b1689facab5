macros_utils::routes! {
    load index,
    load ping,
}
