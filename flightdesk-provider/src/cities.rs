/// The 81 provinces of Türkiye.
pub const TURKISH_CITIES: [&str; 81] = [
    "Adana", "Adıyaman", "Afyonkarahisar", "Ağrı", "Amasya",
    "Ankara", "Antalya", "Artvin", "Aydın", "Balıkesir",
    "Bilecik", "Bingöl", "Bitlis", "Bolu", "Burdur",
    "Bursa", "Çanakkale", "Çankırı", "Çorum", "Denizli",
    "Diyarbakır", "Edirne", "Elazığ", "Erzincan", "Erzurum",
    "Eskişehir", "Gaziantep", "Giresun", "Gümüşhane", "Hakkari",
    "Hatay", "Isparta", "İçel (Mersin)", "İstanbul", "İzmir",
    "Kars", "Kastamonu", "Kayseri", "Kırklareli", "Kırşehir",
    "Kocaeli", "Konya", "Kütahya", "Malatya", "Manisa",
    "Kahramanmaraş", "Mardin", "Muğla", "Muş", "Nevşehir",
    "Niğde", "Ordu", "Rize", "Sakarya", "Samsun",
    "Siirt", "Sinop", "Sivas", "Tekirdağ", "Tokat",
    "Trabzon", "Tunceli", "Şanlıurfa", "Uşak", "Van",
    "Yozgat", "Zonguldak", "Aksaray", "Bayburt", "Karaman",
    "Kırıkkale", "Batman", "Şırnak", "Bartın", "Ardahan",
    "Iğdır", "Yalova", "Karabük", "Kilis", "Osmaniye",
    "Düzce",
];

pub const WORLD_CITIES: [&str; 40] = [
    "Amsterdam", "Athens", "Bangkok", "Barcelona", "Berlin",
    "Bogotá", "Brussels", "Buenos Aires", "Cairo", "Cape Town",
    "Chicago", "Copenhagen", "Dubai", "Dublin", "Frankfurt",
    "Helsinki", "Hong Kong", "Lisbon", "London", "Los Angeles",
    "Madrid", "Mexico City", "Milan", "Montréal", "Moscow",
    "Munich", "New York", "Oslo", "Paris", "Prague",
    "Reykjavík", "Rome", "São Paulo", "Seoul", "Singapore",
    "Stockholm", "Sydney", "Tokyo", "Vienna", "Zürich",
];
