//! 入出力ユーティリティ（`-` は標準入出力、`.gz` は gzip）

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// ファイル全体を文字列で読む（棋譜や gnubg の出力は1ファイル丸ごと扱う）
pub fn read_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let p = path.as_ref();
    if !is_stdio(p) && !is_gzip(p) {
        return std::fs::read_to_string(p);
    }
    let mut text = String::new();
    if is_stdio(p) {
        io::stdin().lock().read_to_string(&mut text)?;
    } else {
        GzDecoder::new(File::open(p)?).read_to_string(&mut text)?;
    }
    Ok(text)
}

enum Sink {
    Stdout(io::Stdout),
    File(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

/// 出力先。gzip の終端を書き切るために `close()` を呼ぶ。
#[must_use = "call .close() to propagate compression/IO errors"]
pub struct Writer {
    sink: Sink,
    lines: usize,
}

impl Writer {
    fn inner(&mut self) -> &mut dyn Write {
        match &mut self.sink {
            Sink::Stdout(s) => s,
            Sink::File(f) => f,
            Sink::Gz(e) => e,
        }
    }

    /// テキストをそのまま書く（gnubg スクリプトなど）
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.inner().write_all(text.as_bytes())?;
        self.lines += text.lines().count();
        Ok(())
    }

    /// 1行1レコードの JSON を書く
    pub fn write_json_line<T: Serialize>(&mut self, record: &T) -> io::Result<()> {
        let out = self.inner();
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// 書き切って、書いた行数を返す
    pub fn close(self) -> io::Result<usize> {
        match self.sink {
            Sink::Stdout(mut s) => s.flush()?,
            Sink::File(f) => {
                f.into_inner().map_err(|e| e.into_error())?;
            }
            Sink::Gz(e) => e.finish()?.flush()?,
        }
        Ok(self.lines)
    }
}

pub fn open_writer<P: AsRef<Path>>(path: P) -> io::Result<Writer> {
    let p = path.as_ref();
    let sink = if is_stdio(p) {
        Sink::Stdout(io::stdout())
    } else if is_gzip(p) {
        Sink::Gz(GzEncoder::new(BufWriter::new(File::create(p)?), Compression::default()))
    } else {
        Sink::File(BufWriter::new(File::create(p)?))
    };
    Ok(Writer { sink, lines: 0 })
}
