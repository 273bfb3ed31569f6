//! OpenGL object wrappers.
//!
//! This crate exposes thin [OpenGL](https://www.khronos.org/opengl/) 3.3 object wrappers. Every
//! wrapper follows the same discipline:
//!
//! - The native handle is acquired when the value is created. A null handle coming back from the
//!   driver is an error, never a silently broken object.
//! - The handle is released when the value is dropped.
//! - Binding an object is done through a _scoped guard_ (`Scoped*Bind`). The guard remembers what
//!   was bound before it and restores it when it goes out of scope, so code using the wrappers
//!   never leaks binding state into its caller.
//!
//! Objects that reference other objects (a vertex array referencing buffers, a program
//! referencing shaders, a framebuffer referencing textures) keep them alive with [`Rc`].
//!
//! > Note: all the functions of this crate expect a current OpenGL context on the calling thread
//! > with entry points loaded through [`gl::load_with`]. `glplus-sdl2` does that for you.
//!
//! [`Rc`]: std::rc::Rc

pub mod buffer;
pub mod draw;
pub mod error;
pub mod framebuffer;
pub mod program;
pub mod renderbuffer;
pub mod shader;
mod state;
pub mod texture;
pub mod vertex_array;

pub use self::buffer::{Buffer, BufferTarget, BufferUsage, ScopedBufferBind};
pub use self::draw::{
  clear, draw_arrays, draw_elements, set_clear_color, set_depth_test, set_viewport, ClearMask,
  Primitive,
};
pub use self::error::{check_gl_errors, GlError};
pub use self::framebuffer::{
  Attachment, FrameBuffer, FramebufferError, FramebufferStatus, ScopedFrameBufferBind,
};
pub use self::program::{Program, ProgramError, ScopedProgramBind, Uniformable};
pub use self::renderbuffer::{RenderBuffer, ScopedRenderBufferBind};
pub use self::shader::{Shader, ShaderError, ShaderType};
pub use self::texture::{
  decode_image, DecodedImage, ImageFlags, InternalFormat, MagFilter, MinFilter, Sampler,
  ScopedTextureBind, Texture2D, TextureError, Wrap,
};
pub use self::vertex_array::{
  AttributeType, IndexType, ScopedVertexArrayBind, VertexArray, VertexArrayError,
  VertexAttribute,
};

pub use gl;
