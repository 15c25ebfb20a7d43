use crate::codec::{CodecOptions, TableCodec};
use crate::driver::Platform;
use crate::error::{Result, StataError};
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// Stand-in for Stata batch mode, run through `/bin/sh`.
///
/// - echoes every do-file line as `. <line>`
/// - `display <integer expression>` prints the value
/// - `use "<path>"` remembers the dataset; `save`/`saveold "<path>"` copies it
/// - `error <n>` prints `r(<n>);` and carries on, as inside `capture noisily`
/// - `crash` stops immediately with exit code 3
/// - with `/e`, all output goes to `<script stem>.log` in the working directory
const FAKE_STATA: &str = r#"script=""
batch=""
for arg in "$@"; do
  case "$arg" in
    /e) batch=1 ;;
    do) ;;
    *) script="$arg" ;;
  esac
done
if [ -n "$batch" ]; then
  exec > "$(basename "$script" .do).log" 2>&1
fi
echo "  ___  ____  ____  ____  ____ (R)"
echo " /__    /   ____/   /   ____/   fake Stata"
echo ""
data=""
while IFS= read -r line || [ -n "$line" ]; do
  printf '. %s\n' "$line"
  case "$line" in
    "display "*)
      expr=${line#display }
      echo $(( $expr ))
      ;;
    "use "*)
      data=$(printf '%s\n' "$line" | sed -e 's/^use "\([^"]*\)".*$/\1/')
      ;;
    "save "*|"saveold "*)
      out=$(printf '%s\n' "$line" | sed -e 's/^save[old]* "\([^"]*\)".*$/\1/')
      if [ -n "$data" ]; then cp "$data" "$out"; else : > "$out"; fi
      ;;
    "error "*)
      echo "r(${line#error });"
      ;;
    "crash")
      echo "unexpected end of file"
      exit 3
      ;;
    "exit, clear STATA")
      echo "end of do-file"
      exit 0
      ;;
  esac
done < "$script"
echo "end of do-file"
"#;

/// Write the fake interpreter into `dir` and return its path.
pub(crate) fn install_fake_stata(dir: &Path) -> PathBuf {
    install_interpreter(dir, "fake-stata", FAKE_STATA)
}

/// Write an arbitrary sh body as an interpreter stand-in.
pub(crate) fn install_interpreter(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(format!("{}.sh", name));
    std::fs::write(&path, body).unwrap();
    path
}

/// Settings that run `interpreter` through `/bin/sh`.
///
/// Going through the shell avoids exec'ing a file this process just wrote,
/// which can fail with ETXTBSY while other test threads fork.
pub(crate) fn sh_settings(interpreter: &Path, platform: Platform) -> Settings {
    let mut settings = Settings::new("/bin/sh", 17);
    settings.extra_args = vec![interpreter.to_string_lossy().into_owned()];
    settings.platform = platform;
    settings
}

/// Line-based codec: the table is a list of text rows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinesCodec;

impl TableCodec for LinesCodec {
    type Table = Vec<String>;

    fn encode(
        &self,
        table: &Vec<String>,
        _format_revision: u32,
        _options: &CodecOptions,
        destination: &Path,
    ) -> Result<()> {
        let mut text = table.join("\n");
        text.push('\n');
        std::fs::write(destination, text).map_err(|e| StataError::Codec(e.to_string()))
    }

    fn decode(
        &self,
        source: &Path,
        _format_revision: u32,
        _options: &CodecOptions,
    ) -> Result<Vec<String>> {
        let text =
            std::fs::read_to_string(source).map_err(|e| StataError::Codec(e.to_string()))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

/// Entries directly inside `dir`, sorted.
pub(crate) fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
