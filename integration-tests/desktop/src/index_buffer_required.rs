use crate::{hidden_window, FixtureResult};
use glplus::{
  draw_elements, Buffer, BufferTarget, BufferUsage, IndexType, Primitive, Program, VertexArray,
  VertexArrayError, VertexAttribute,
};
use std::rc::Rc;

const VS: &str = "#version 330 core
in vec2 position;
void main() {
  gl_Position = vec4(position, 0., 1.);
}";

const FS: &str = "#version 330 core
out vec4 frag;
void main() {
  frag = vec4(1.);
}";

pub fn fixture() -> FixtureResult {
  let (_sdl, _window) = hidden_window("index-buffer-required")?;

  let program = Program::from_sources(VS, FS)?;
  let position = program.attribute_location("position")?;

  let vertices = Rc::new(Buffer::from_slice(
    BufferTarget::Array,
    &[[-1f32, -1.], [1., -1.], [0., 1.]],
    BufferUsage::StaticDraw,
  )?);
  let indices = Rc::new(Buffer::from_slice(
    BufferTarget::ElementArray,
    &[0u16, 1, 2],
    BufferUsage::StaticDraw,
  )?);

  let mut vertex_array = VertexArray::new()?;
  vertex_array.set_attribute(VertexAttribute::floats(position, 2), &vertices)?;

  let err = draw_elements(&program, &vertex_array, Primitive::Triangles, 0, 3);
  ensure!(
    err == Err(VertexArrayError::NoIndexBuffer),
    "indexed draw without indices: {:?}",
    err
  );

  // buffers are typed by target
  let err = vertex_array.set_attribute(VertexAttribute::floats(position, 2), &indices);
  ensure!(
    err
      == Err(VertexArrayError::WrongBufferTarget {
        expected: BufferTarget::Array,
        found: BufferTarget::ElementArray,
      }),
    "element buffer accepted as vertex source: {:?}",
    err
  );

  let err = vertex_array.set_index_buffer(&vertices, IndexType::UnsignedShort);
  ensure!(
    matches!(err, Err(VertexArrayError::WrongBufferTarget { .. })),
    "array buffer accepted as index source"
  );

  vertex_array.set_index_buffer(&indices, IndexType::UnsignedShort)?;
  ensure!(
    vertex_array.index_type() == Ok(IndexType::UnsignedShort),
    "index type not recorded"
  );
  draw_elements(&program, &vertex_array, Primitive::Triangles, 0, 3)?;

  Ok(())
}
