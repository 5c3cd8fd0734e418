//! The particle system controller.
//!
//! Owns the buffer pair, the seed buffer, both pipelines and the emission
//! state; issues one simulation pass per `update` and one indirect draw per
//! `draw`. The live particle count exists only on the GPU - `update` hands
//! the append counter to the simulation stage and `draw` consumes it via
//! `draw_indirect`, so the host never stalls on a readback.

use bytemuck::{bytes_of, Pod, Zeroable};
use glam::Vec3;

use crate::buffers::ParticleBuffers;
use crate::camera::ViewFrame;
use crate::error::{ConfigError, Error};
use crate::particle::ParticleRecord;
use crate::profile::Profile;
use crate::shaders;
use crate::time::MAX_FRAME_DELTA;

/// Must match the workgroup size declared in the simulation shader.
const WORKGROUP_SIZE: u32 = 256;

/// Construction parameters for a [`ParticleSystem`].
pub struct SystemDesc {
    /// Buffer capacity; the live population can never exceed it.
    pub max_particles: u32,
    /// Where the emitter sits.
    pub emit_position: Vec3,
    /// Visual/physics profile, fixed for the system's lifetime.
    pub profile: Profile,
    /// Format of the color target `draw` renders into.
    pub color_format: wgpu::TextureFormat,
    /// Format of the depth attachment `draw` tests against.
    pub depth_format: wgpu::TextureFormat,
}

/// Host-side emission parameters, owned by the controller. An explicit
/// struct rather than process globals so independent systems coexist.
#[derive(Debug, Clone, Copy)]
pub struct EmissionState {
    emit_position: Vec3,
    total_elapsed: f32,
    reset_requested: bool,
}

impl EmissionState {
    fn new(emit_position: Vec3) -> Self {
        Self {
            emit_position,
            total_elapsed: 0.0,
            reset_requested: false,
        }
    }

    /// Current emitter position.
    pub fn emit_position(&self) -> Vec3 {
        self.emit_position
    }

    /// Seconds of simulation advanced since creation or the last reset.
    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SimParams {
    emit_position: [f32; 3],
    delta_time: f32,
    total_time: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ViewParams {
    view_proj: [[f32; 4]; 4],
    eye_position: [f32; 3],
    _pad: f32,
}

/// A GPU-resident particle system.
pub struct ParticleSystem {
    profile: Profile,
    emission: EmissionState,
    buffers: ParticleBuffers,
    sim_pipeline: wgpu::ComputePipeline,
    sim_bind_groups: [wgpu::BindGroup; 4],
    sim_uniforms: wgpu::Buffer,
    render_pipeline: wgpu::RenderPipeline,
    render_bind_group: wgpu::BindGroup,
    render_uniforms: wgpu::Buffer,
    workgroups: u32,
}

impl ParticleSystem {
    /// Build a system. The random table and sprite texture are shared,
    /// read-only resources owned by the caller; the system only records
    /// bindings to them.
    ///
    /// Fails with a configuration error when `max_particles` is zero or
    /// more than the device's storage binding can hold, and never
    /// constructs partial state on failure.
    pub fn new(
        device: &wgpu::Device,
        desc: &SystemDesc,
        random_table: &wgpu::TextureView,
        sprite: &wgpu::TextureView,
        sprite_sampler: &wgpu::Sampler,
    ) -> Result<Self, Error> {
        let record_limit = (device.limits().max_storage_buffer_binding_size as u64
            / ParticleRecord::STRIDE) as u32;
        if desc.max_particles == 0 {
            return Err(ConfigError::ZeroParticleCount.into());
        }
        if desc.max_particles > record_limit {
            return Err(ConfigError::ParticleCountExceedsLimit {
                requested: desc.max_particles,
                limit: record_limit,
            }
            .into());
        }

        let steady_state = desc.profile.steady_state_population();
        if steady_state > desc.max_particles {
            log::warn!(
                "capacity {} is below the profile's steady state of ~{} particles; \
                 the population will saturate",
                desc.max_particles,
                steady_state
            );
        }

        use wgpu::util::DeviceExt;

        let buffers = ParticleBuffers::new(device, desc.max_particles, desc.emit_position);

        let sim_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("simulation uniforms"),
            contents: bytes_of(&SimParams {
                emit_position: desc.emit_position.to_array(),
                delta_time: 0.0,
                total_time: 0.0,
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let render_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("render uniforms"),
            contents: bytes_of(&ViewParams {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                eye_position: [0.0; 3],
                _pad: 0.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (sim_pipeline, sim_bind_groups) = Self::build_simulation(
            device,
            &desc.profile,
            &buffers,
            &sim_uniforms,
            random_table,
        );
        let (render_pipeline, render_bind_group) = Self::build_render(
            device,
            desc,
            &render_uniforms,
            sprite,
            sprite_sampler,
        );

        Ok(Self {
            profile: desc.profile.clone(),
            emission: EmissionState::new(desc.emit_position),
            buffers,
            sim_pipeline,
            sim_bind_groups,
            sim_uniforms,
            render_pipeline,
            render_bind_group,
            render_uniforms,
            workgroups: desc.max_particles.div_ceil(WORKGROUP_SIZE),
        })
    }

    fn build_simulation(
        device: &wgpu::Device,
        profile: &Profile,
        buffers: &ParticleBuffers,
        uniforms: &wgpu::Buffer,
        random_table: &wgpu::TextureView,
    ) -> (wgpu::ComputePipeline, [wgpu::BindGroup; 4]) {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle simulate"),
            source: wgpu::ShaderSource::Wgsl(shaders::simulation_shader(profile).into()),
        });

        let storage = |read_only| wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        };
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("simulate bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: storage(true),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: storage(true),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: storage(false),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: storage(false),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D1,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        // One bind group per legal route through the buffers; see
        // `Route::bind_index` for the ordering.
        let make_group = |label: &str,
                          input: (&wgpu::Buffer, &wgpu::Buffer),
                          output: (&wgpu::Buffer, &wgpu::Buffer)| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: input.0.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: input.1.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: output.0.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: output.1.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: wgpu::BindingResource::TextureView(random_table),
                    },
                ],
            })
        };

        use crate::buffers::SimInput;
        let bind_groups = [
            make_group(
                "simulate seed->a",
                buffers.input(SimInput::Seed),
                buffers.output(0),
            ),
            make_group(
                "simulate seed->b",
                buffers.input(SimInput::Seed),
                buffers.output(1),
            ),
            make_group(
                "simulate a->b",
                buffers.input(SimInput::Slot(0)),
                buffers.output(1),
            ),
            make_group(
                "simulate b->a",
                buffers.input(SimInput::Slot(1)),
                buffers.output(0),
            ),
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("simulate pipeline layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("simulate pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        (pipeline, bind_groups)
    }

    fn build_render(
        device: &wgpu::Device,
        desc: &SystemDesc,
        uniforms: &wgpu::Buffer,
        sprite: &wgpu::TextureView,
        sprite_sampler: &wgpu::Sampler,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle render"),
            source: wgpu::ShaderSource::Wgsl(shaders::render_shader(&desc.profile).into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("render bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("render bind group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(sprite),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sprite_sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render pipeline layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[ParticleRecord::vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(desc.profile.blend.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Particles test against the scene but never write depth, so
            // overlapping billboards blend instead of occluding each other.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: desc.depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    /// Discard every live flare and restart from the seed emitter on the
    /// next `update`. Takes effect at that frame boundary as a whole; no
    /// draw can observe a half-reset generation.
    pub fn reset(&mut self) {
        self.emission.reset_requested = true;
    }

    /// Move the emitter. The simulation re-seats the emitter from this
    /// value every pass, so the change is continuous; the seed record
    /// follows at the next reset.
    pub fn set_emit_position(&mut self, position: Vec3) {
        self.emission.emit_position = position;
    }

    /// Host-visible emission parameters.
    pub fn emission(&self) -> &EmissionState {
        &self.emission
    }

    /// Buffer capacity in records.
    pub fn capacity(&self) -> u32 {
        self.buffers.capacity()
    }

    /// The profile this system was built with.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Advance the population by `dt` seconds: pick the input generation
    /// (the seed when a reset is pending or nothing has run yet), append
    /// the next generation into the other pool and make it current.
    ///
    /// Encodes exactly one compute pass; the caller submits `encoder`
    /// afterwards, which is also what orders the queue writes issued here
    /// ahead of the pass.
    pub fn update(&mut self, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, dt: f32) {
        // First frame after a stall must not integrate a giant step.
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);

        let reset = self.emission.reset_requested;
        if reset {
            self.emission.reset_requested = false;
            self.emission.total_elapsed = 0.0;
            self.buffers
                .reauthor_seed(queue, ParticleRecord::emitter(self.emission.emit_position));
        }
        self.emission.total_elapsed += dt;

        let route = self.buffers.begin_update(reset);
        self.buffers.clear_output_args(queue, route.output);

        queue.write_buffer(
            &self.sim_uniforms,
            0,
            bytes_of(&SimParams {
                emit_position: self.emission.emit_position.to_array(),
                delta_time: dt,
                total_time: self.emission.total_elapsed,
                _pad: [0.0; 3],
            }),
        );

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("particle simulate"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.sim_pipeline);
        pass.set_bind_group(0, &self.sim_bind_groups[route.bind_index()], &[]);
        pass.dispatch_workgroups(self.workgroups, 1, 1);
    }

    /// Render the current generation into `rpass`. Strictly read-only with
    /// respect to particle state; calling it any number of times between
    /// updates draws the same population.
    pub fn draw(&self, queue: &wgpu::Queue, rpass: &mut wgpu::RenderPass<'_>, frame: &ViewFrame) {
        queue.write_buffer(
            &self.render_uniforms,
            0,
            bytes_of(&ViewParams {
                view_proj: frame.view_proj.to_cols_array_2d(),
                eye_position: frame.eye_position.to_array(),
                _pad: 0.0,
            }),
        );

        let (particles, args) = self.buffers.current();
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, &self.render_bind_group, &[]);
        rpass.set_vertex_buffer(0, particles.slice(..));
        rpass.draw_indirect(args, 0);
    }
}
