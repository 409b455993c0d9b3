/// Output of a size-targeted encode plus what the search ended on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult {
    pub buffer: Vec<u8>,
    pub quality: u8,
    pub met_target: bool,
    // 実際に行ったエンコード回数
    pub passes: u32,
}

impl EncodeResult {
    pub fn size(&self) -> usize {
        self.buffer.len()
    }
}
