use nanoid::nanoid;

/// ストアが割り当てるノートID用のnanoIdを生成する
///
/// # 戻り値
/// 21文字のURL-safeなnanoId
pub fn generate_bill_id() -> String {
    nanoid!()
}

/// 領収書ファイルキー用の短いnanoIdを生成する
///
/// # 引数
/// * `length` - 生成するIDの長さ
pub fn generate_file_key(length: usize) -> String {
    nanoid!(length)
}
