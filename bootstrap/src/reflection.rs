//! gRPC 反射辅助工具

pub use tonic_reflection::server::v1::{ServerReflection, ServerReflectionServer};

/// 构建一个包含指定文件描述符集的反射服务
pub fn build_reflection(
    file_descriptor_sets: &[&'static [u8]],
) -> Result<ServerReflectionServer<impl ServerReflection>, tonic_reflection::server::Error> {
    let mut builder = tonic_reflection::server::Builder::configure();
    for fds in file_descriptor_sets.iter().copied() {
        builder = builder.register_encoded_file_descriptor_set(fds);
    }
    builder.build_v1()
}
