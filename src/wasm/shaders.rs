//! GLSL ES 3.0 sources for the mesh and its point cloud.

/// Shared vertex stage: simplex-noise breathing plus a bulge toward the
/// magnetic point scaled by pointer influence.
pub const VERTEX: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in float a_seed;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform vec3 u_magnet;
uniform float u_influence;
uniform float u_point_size;
uniform float u_pixel_ratio;

out vec3 v_normal;
out float v_noise;
out float v_seed;

vec3 mod289(vec3 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec4 mod289(vec4 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec4 permute(vec4 x) { return mod289(((x * 34.0) + 1.0) * x); }
vec4 taylorInvSqrt(vec4 r) { return 1.79284291400159 - 0.85373472095314 * r; }

float snoise(vec3 v) {
    const vec2 C = vec2(1.0 / 6.0, 1.0 / 3.0);
    const vec4 D = vec4(0.0, 0.5, 1.0, 2.0);
    vec3 i = floor(v + dot(v, C.yyy));
    vec3 x0 = v - i + dot(i, C.xxx);
    vec3 g = step(x0.yzx, x0.xyz);
    vec3 l = 1.0 - g;
    vec3 i1 = min(g.xyz, l.zxy);
    vec3 i2 = max(g.xyz, l.zxy);
    vec3 x1 = x0 - i1 + C.xxx;
    vec3 x2 = x0 - i2 + C.yyy;
    vec3 x3 = x0 - D.yyy;
    i = mod289(i);
    vec4 p = permute(permute(permute(
        i.z + vec4(0.0, i1.z, i2.z, 1.0))
        + i.y + vec4(0.0, i1.y, i2.y, 1.0))
        + i.x + vec4(0.0, i1.x, i2.x, 1.0));
    float n_ = 0.142857142857;
    vec3 ns = n_ * D.wyz - D.xzx;
    vec4 j = p - 49.0 * floor(p * ns.z * ns.z);
    vec4 x_ = floor(j * ns.z);
    vec4 y_ = floor(j - 7.0 * x_);
    vec4 x = x_ * ns.x + ns.yyyy;
    vec4 y = y_ * ns.x + ns.yyyy;
    vec4 h = 1.0 - abs(x) - abs(y);
    vec4 b0 = vec4(x.xy, y.xy);
    vec4 b1 = vec4(x.zw, y.zw);
    vec4 s0 = floor(b0) * 2.0 + 1.0;
    vec4 s1 = floor(b1) * 2.0 + 1.0;
    vec4 sh = -step(h, vec4(0.0));
    vec4 a0 = b0.xzyw + s0.xzyw * sh.xxyy;
    vec4 a1 = b1.xzyw + s1.xzyw * sh.zzww;
    vec3 p0 = vec3(a0.xy, h.x);
    vec3 p1 = vec3(a0.zw, h.y);
    vec3 p2 = vec3(a1.xy, h.z);
    vec3 p3 = vec3(a1.zw, h.w);
    vec4 norm = taylorInvSqrt(vec4(dot(p0, p0), dot(p1, p1), dot(p2, p2), dot(p3, p3)));
    p0 *= norm.x; p1 *= norm.y; p2 *= norm.z; p3 *= norm.w;
    vec4 m = max(0.6 - vec4(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), 0.0);
    m = m * m;
    return 42.0 * dot(m * m, vec4(dot(p0, x0), dot(p1, x1), dot(p2, x2), dot(p3, x3)));
}

void main() {
    float n = snoise(a_position * 0.9 + vec3(u_time * 0.25));
    vec3 displaced = a_position + a_normal * n * 0.18;

    vec4 world = u_model * vec4(displaced, 1.0);
    vec3 toMagnet = u_magnet - world.xyz;
    float pull = exp(-dot(toMagnet, toMagnet) * 0.8) * u_influence;
    world.xyz += normalize(toMagnet + vec3(1e-5)) * pull * 0.6;

    v_normal = normalize(mat3(u_model) * a_normal);
    v_noise = n;
    v_seed = a_seed;
    gl_Position = u_projection * u_view * world;
    gl_PointSize = u_point_size * u_pixel_ratio * (0.6 + a_seed) / max(gl_Position.w, 0.1);
}
"#;

pub const MESH_FRAGMENT: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in float v_noise;
in float v_seed;

uniform vec3 u_color_a;
uniform vec3 u_color_b;
uniform float u_alpha;

out vec4 outColor;

void main() {
    float rim = 1.0 - abs(v_normal.z);
    vec3 color = mix(u_color_a, u_color_b, clamp(v_noise * 0.5 + 0.5, 0.0, 1.0));
    color += pow(rim, 3.0) * 0.35;
    outColor = vec4(color, u_alpha);
}
"#;

pub const POINTS_FRAGMENT: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in float v_noise;
in float v_seed;

uniform vec3 u_color_a;
uniform vec3 u_color_b;
uniform float u_alpha;

out vec4 outColor;

void main() {
    vec2 c = gl_PointCoord - 0.5;
    float d = length(c);
    if (d > 0.5) discard;
    float soft = smoothstep(0.5, 0.0, d);
    vec3 color = mix(u_color_b, u_color_a, v_seed);
    outColor = vec4(color, soft * u_alpha);
}
"#;
