//! GPU passes that compose a frame: the vello scene, then the egui panel.

use vello::wgpu;

/// Texture the scene is rendered into before it reaches the surface.
///
/// Vello's compute shaders write through a storage binding, and WebGPU only
/// allows that on `Rgba8Unorm`.
pub(crate) fn scene_target(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("scene target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::STORAGE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Copy the scene onto the surface, converting to the surface format.
pub(crate) fn present_scene(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    blitter: &wgpu::util::TextureBlitter,
    scene: &wgpu::TextureView,
    surface: &wgpu::TextureView,
) {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("scene blit"),
    });
    blitter.copy(device, &mut encoder, scene, surface);
    queue.submit([encoder.finish()]);
}

/// Tessellated panel output for one frame.
pub(crate) struct PanelFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures: egui::TexturesDelta,
    pub screen: egui_wgpu::ScreenDescriptor,
}

/// Draw the panel over what the surface already holds.
pub(crate) fn paint_panel(
    renderer: &mut egui_wgpu::Renderer,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    surface: &wgpu::TextureView,
    panel: &PanelFrame,
) {
    for (id, delta) in &panel.textures.set {
        renderer.update_texture(device, queue, *id, delta);
    }

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("panel encoder"),
    });
    let uploads = renderer.update_buffers(device, queue, &mut encoder, &panel.primitives, &panel.screen);
    {
        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("panel pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        // egui-wgpu renders into a 'static pass
        let mut pass = pass.forget_lifetime();
        renderer.render(&mut pass, &panel.primitives, &panel.screen);
    }
    queue.submit(uploads.into_iter().chain([encoder.finish()]));

    for id in &panel.textures.free {
        renderer.free_texture(id);
    }
}
