/// WGSL shader for lit model meshes.
///
/// Lighting is Lambert diffuse from one summed ambient term plus up to
/// `MAX_DIRECTIONAL_LIGHTS` directional lights. The tone curves mirror
/// `ToneMapping::apply` in `glbview-render`.
pub const MODEL_SHADER: &str = r#"
const MAX_DIRECTIONAL_LIGHTS: u32 = 4u;

struct Globals {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    light_dir: array<vec4<f32>, 4>,
    light_color: array<vec4<f32>, 4>,
    // x: exposure
    params: vec4<f32>,
    // x: tone mapping, y: encode sRGB in shader, z: directional light count
    flags: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) normal_0: vec4<f32>,
    @location(7) normal_1: vec4<f32>,
    @location(8) normal_2: vec4<f32>,
    @location(9) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let normal_matrix = mat3x3<f32>(
        instance.normal_0.xyz,
        instance.normal_1.xyz,
        instance.normal_2.xyz,
    );

    var out: VertexOutput;
    out.clip_position = globals.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.world_normal = normal_matrix * vertex.normal;
    out.color = instance.color;
    return out;
}

fn rrt_and_odt_fit(v: vec3<f32>) -> vec3<f32> {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    return a / b;
}

fn aces_filmic(color: vec3<f32>, exposure: f32) -> vec3<f32> {
    let aces_input = mat3x3<f32>(
        vec3<f32>(0.59719, 0.07600, 0.02840),
        vec3<f32>(0.35458, 0.90834, 0.13383),
        vec3<f32>(0.04823, 0.01566, 0.83777),
    );
    let aces_output = mat3x3<f32>(
        vec3<f32>(1.60475, -0.10208, -0.00327),
        vec3<f32>(-0.53108, 1.10813, -0.07276),
        vec3<f32>(-0.07367, -0.00605, 1.07602),
    );
    let v = aces_input * (color * (exposure / 0.6));
    return clamp(aces_output * rrt_and_odt_fit(v), vec3<f32>(0.0), vec3<f32>(1.0));
}

fn tone_map(color: vec3<f32>) -> vec3<f32> {
    let exposure = globals.params.x;
    switch globals.flags.x {
        case 1u: {
            return clamp(color * exposure, vec3<f32>(0.0), vec3<f32>(1.0));
        }
        case 2u: {
            let c = color * exposure;
            return clamp(c / (vec3<f32>(1.0) + c), vec3<f32>(0.0), vec3<f32>(1.0));
        }
        case 3u: {
            return aces_filmic(color, exposure);
        }
        default: {
            return color;
        }
    }
}

fn srgb_encode(c: vec3<f32>) -> vec3<f32> {
    let low = c * 12.92;
    let high = 1.055 * pow(max(c, vec3<f32>(0.0)), vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(high, low, c <= vec3<f32>(0.0031308));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    var irradiance = globals.ambient.rgb;
    let count = min(globals.flags.z, MAX_DIRECTIONAL_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        let l = globals.light_dir[i].xyz;
        irradiance = irradiance + globals.light_color[i].rgb * max(dot(n, l), 0.0);
    }

    var rgb = tone_map(in.color.rgb * irradiance);
    if globals.flags.y != 0u {
        rgb = srgb_encode(rgb);
    }
    // Premultiplied output for transparent surfaces.
    return vec4<f32>(rgb * in.color.a, in.color.a);
}
"#;
