use colored::Colorize as _;
use glplus_sdl2::{LibSdl, Window, WindowDim, WindowOpt};
use std::error::Error;
use std::process;

pub type FixtureResult = Result<(), Box<dyn Error>>;

/// Open a small hidden window with a current OpenGL 3.3 core context.
pub fn hidden_window(name: &str) -> Result<(LibSdl, Window), Box<dyn Error>> {
  let sdl = LibSdl::init()?;
  let opt = WindowOpt::default()
    .set_title(name)
    .set_dim(WindowDim::Windowed {
      width: 64,
      height: 64,
    })
    .set_hidden(true);
  let window = Window::new(&sdl, &opt)?;

  Ok((sdl, window))
}

/// Fail the fixture with `msg` unless `cond` holds.
macro_rules! ensure {
  ($cond:expr, $($msg:tt)+) => {
    if !$cond {
      return Err(format!($($msg)+).into());
    }
  }
}

macro_rules! tests {
  ($($name:expr, $module:ident),*) => {
    // declare the modules for all tests
    $(
      mod $module;
    )*

    // list of all available integration tests
    const TEST_NAMES: &[&str] = &[$( $name ),*];

    // run a given test
    fn run_test(name: &str) -> Option<FixtureResult> {
      $(
        if name == $name {
          return Some($module::fixture());
        }
      )*

      None
    }
  }
}

tests! {
  "scoped-bind-restore", scoped_bind_restore,
  "framebuffer-completeness", framebuffer_completeness,
  "index-buffer-required", index_buffer_required,
  "shader-errors", shader_errors,
  "shared-resources-outlive-owner", shared_resources,
  "mesh-render", mesh_render,
  "error-queue-drained", error_queue,
  "texture-upload-state", texture_upload_state
}

fn show_available_tests() {
  for test_name in TEST_NAMES {
    println!("  -> {}", test_name.blue());
  }
}

fn run_and_report(name: &str) -> bool {
  println!("test name: {}", name.green());

  match run_test(name) {
    Some(Ok(())) => {
      println!("{} {}", name, "ok".green());
      true
    }

    Some(Err(e)) => {
      println!("{} {}: {}", name, "FAILED".red(), e);
      false
    }

    None => {
      println!("{} is not a valid test. Possible values", name.red());
      show_available_tests();
      false
    }
  }
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();

  let test_name = std::env::args().nth(1);

  let success = match test_name.as_deref() {
    Some("all") => TEST_NAMES
      .iter()
      .map(|name| run_and_report(name))
      .fold(true, |acc, ok| acc && ok),

    Some(name) => run_and_report(name),

    None => {
      println!("Please provide a test name (or all). Possible values");
      show_available_tests();
      true
    }
  };

  if !success {
    process::exit(1);
  }
}
