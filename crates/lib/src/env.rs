//! Environment strings for commands run against a staged or primed tree.
//!
//! Entries are `NAME=value` shell assignments. Values are quoted and extend
//! the inherited variable (`PATH="<root>/bin:$PATH"`), so they only make sense
//! when applied by a shell in order.

use std::path::Path;

/// Multiarch library directory name of the host, if it has one.
pub fn arch_triplet() -> Option<&'static str> {
  match std::env::consts::ARCH {
    "x86_64" => Some("x86_64-linux-gnu"),
    "x86" => Some("i386-linux-gnu"),
    "aarch64" => Some("aarch64-linux-gnu"),
    "arm" => Some("arm-linux-gnueabihf"),
    "powerpc64" => Some("powerpc64le-linux-gnu"),
    "s390x" => Some("s390x-linux-gnu"),
    _ => None,
  }
}

fn lib_dirs(root: &Path) -> Vec<String> {
  let root = root.display();
  let mut dirs = vec![format!("{root}/lib"), format!("{root}/usr/lib")];
  if let Some(triplet) = arch_triplet() {
    dirs.push(format!("{root}/lib/{triplet}"));
    dirs.push(format!("{root}/usr/lib/{triplet}"));
  }
  dirs
}

/// Variables a program installed under `root` needs at runtime.
pub fn runtime_env(root: &Path) -> Vec<String> {
  let r = root.display();
  vec![
    format!("PATH=\"{r}/usr/bin:{r}/bin:$PATH\""),
    format!("LD_LIBRARY_PATH=\"{}:$LD_LIBRARY_PATH\"", lib_dirs(root).join(":")),
  ]
}

/// Compiler and linker variables pointing at headers and libraries under `root`.
pub fn build_env(root: &Path) -> Vec<String> {
  let r = root.display();
  let includes = format!("-I{r}/include -I{r}/usr/include");
  let libs = lib_dirs(root)
    .iter()
    .map(|dir| format!("-L{dir}"))
    .collect::<Vec<_>>()
    .join(" ");

  vec![
    format!("CFLAGS=\"{includes} $CFLAGS\""),
    format!("CPPFLAGS=\"{includes} $CPPFLAGS\""),
    format!("CXXFLAGS=\"{includes} $CXXFLAGS\""),
    format!("LDFLAGS=\"{libs} $LDFLAGS\""),
    format!("PKG_CONFIG_PATH=\"{r}/lib/pkgconfig:{r}/usr/lib/pkgconfig:$PKG_CONFIG_PATH\""),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn runtime_env_extends_inherited_values() {
    let env = runtime_env(Path::new("/stage"));

    assert_eq!(env[0], "PATH=\"/stage/usr/bin:/stage/bin:$PATH\"");
    assert!(env[1].starts_with("LD_LIBRARY_PATH=\"/stage/lib:/stage/usr/lib"));
    assert!(env[1].ends_with(":$LD_LIBRARY_PATH\""));
  }

  #[test]
  fn build_env_names() {
    let env = build_env(Path::new("/stage"));
    let names: Vec<&str> = env.iter().filter_map(|e| e.split_once('=')).map(|(n, _)| n).collect();

    assert_eq!(names, vec!["CFLAGS", "CPPFLAGS", "CXXFLAGS", "LDFLAGS", "PKG_CONFIG_PATH"]);
    assert!(env[0].contains("-I/stage/usr/include"));
    assert!(env[3].starts_with("LDFLAGS=\"-L/stage/lib -L/stage/usr/lib"));
  }
}
